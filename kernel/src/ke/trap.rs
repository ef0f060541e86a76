//! Trap Frame
//!
//! Register snapshot pushed by the interrupt/exception entry stubs. The
//! monitor only carries it through to command handlers; the one place it
//! looks inside is the entry banner.

use core::fmt;

/// Saved CPU state at the point of a trap
#[derive(Debug, Clone, Copy, Default)]
#[repr(C)]
pub struct TrapFrame {
    pub r15: u64,
    pub r14: u64,
    pub r13: u64,
    pub r12: u64,
    pub r11: u64,
    pub r10: u64,
    pub r9: u64,
    pub r8: u64,
    pub rbp: u64,
    pub rdi: u64,
    pub rsi: u64,
    pub rdx: u64,
    pub rcx: u64,
    pub rbx: u64,
    pub rax: u64,

    /// Vector number pushed by the entry stub
    pub trapno: u64,
    /// Hardware error code (0 when the vector has none)
    pub err: u64,

    // Pushed by the CPU
    pub rip: u64,
    pub cs: u64,
    pub rflags: u64,
    pub rsp: u64,
    pub ss: u64,
}

impl TrapFrame {
    /// Short name for the trap vector
    pub fn trap_name(&self) -> &'static str {
        match self.trapno {
            0 => "Divide error",
            1 => "Debug",
            2 => "Non-Maskable Interrupt",
            3 => "Breakpoint",
            4 => "Overflow",
            5 => "BOUND Range Exceeded",
            6 => "Invalid Opcode",
            7 => "Device Not Available",
            8 => "Double Fault",
            10 => "Invalid TSS",
            11 => "Segment Not Present",
            12 => "Stack Fault",
            13 => "General Protection",
            14 => "Page Fault",
            16 => "x87 FPU Floating-Point Error",
            17 => "Alignment Check",
            18 => "Machine-Check",
            19 => "SIMD Floating-Point Exception",
            32..=47 => "Hardware Interrupt",
            _ => "(unknown trap)",
        }
    }
}

/// One-line summary: `trap 0xe Page Fault at rip 0x...`
impl fmt::Display for TrapFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trap {:#x} {} at rip {:#x} err {:#x}",
            self.trapno,
            self.trap_name(),
            self.rip,
            self.err
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn test_summary() {
        let tf = TrapFrame {
            trapno: 14,
            rip: 0xffff_8000_0010_2030,
            err: 2,
            ..TrapFrame::default()
        };
        assert_eq!(
            format!("{}", tf),
            "trap 0xe Page Fault at rip 0xffff800000102030 err 0x2"
        );
    }

    #[test]
    fn test_irq_name() {
        let tf = TrapFrame { trapno: 33, ..TrapFrame::default() };
        assert_eq!(tf.trap_name(), "Hardware Interrupt");
    }
}
