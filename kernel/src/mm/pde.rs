//! Page Directory Entry View
//!
//! The monitor inspects the kernel's two-level 32-bit page tables:
//!
//! ```text
//! 31-22: Page directory index (10 bits)
//! 21-12: Page table index (10 bits)
//! 11-0:  Page offset (12 bits)
//! ```
//!
//! # Entry Format
//! ```text
//! Bit 0:     Present
//! Bit 1:     Read/Write
//! Bit 2:     User/Supervisor
//! Bit 3:     Write-Through
//! Bit 4:     Cache Disable
//! Bit 5:     Accessed
//! Bit 6:     Dirty
//! Bit 7:     Page Size (1=4MB page, directory only)
//! Bit 8:     Global
//! Bits 9-11: Available
//! Bits 12-31: Physical frame address
//! ```

use bitflags::bitflags;

/// Entries per page directory
pub const NPDENTRIES: usize = 1024;

/// Entries per page table
pub const NPTENTRIES: usize = 1024;

/// Shift of the directory index within a linear address
pub const PDXSHIFT: u32 = 22;

/// Shift of the table index within a linear address
pub const PTXSHIFT: u32 = 12;

/// Mask of the flag bits within an entry
pub const PTE_FLAGS_MASK: u32 = 0xfff;

bitflags! {
    /// Permission and status bits of a directory or table entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PteFlags: u32 {
        const PRESENT = 1 << 0;
        const WRITABLE = 1 << 1;
        const USER = 1 << 2;
        const WRITE_THROUGH = 1 << 3;
        const CACHE_DISABLE = 1 << 4;
        const ACCESSED = 1 << 5;
        const DIRTY = 1 << 6;
        const PAGE_SIZE = 1 << 7;
        const GLOBAL = 1 << 8;
        const AVAIL = 0b111 << 9;
    }
}

/// Letters printed for each flag, lowest bit first
const FLAG_LETTERS: [(PteFlags, u8); 9] = [
    (PteFlags::PRESENT, b'P'),
    (PteFlags::WRITABLE, b'W'),
    (PteFlags::USER, b'U'),
    (PteFlags::WRITE_THROUGH, b'T'),
    (PteFlags::CACHE_DISABLE, b'C'),
    (PteFlags::ACCESSED, b'A'),
    (PteFlags::DIRTY, b'D'),
    (PteFlags::PAGE_SIZE, b'S'),
    (PteFlags::GLOBAL, b'G'),
];

impl PteFlags {
    /// Render as a fixed-width `PWUTCADSG` string with `-` for clear bits
    pub fn letters(&self) -> FlagLetters {
        let mut buf = [b'-'; 9];
        for (i, (flag, letter)) in FLAG_LETTERS.iter().enumerate() {
            if self.contains(*flag) {
                buf[i] = *letter;
            }
        }
        FlagLetters(buf)
    }
}

/// Decoded flag string, see [`PteFlags::letters`]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FlagLetters([u8; 9]);

impl FlagLetters {
    pub fn as_str(&self) -> &str {
        // Only ASCII letters and '-' are ever stored
        core::str::from_utf8(&self.0).unwrap_or("?????????")
    }
}

impl core::fmt::Display for FlagLetters {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page directory (or page table) entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Pde(u32);

impl Pde {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn new(phys_addr: u32, flags: u32) -> Self {
        Self((phys_addr & !PTE_FLAGS_MASK) | (flags & PTE_FLAGS_MASK))
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn is_present(&self) -> bool {
        self.flags().contains(PteFlags::PRESENT)
    }

    /// Directory entry maps a 4MB page directly
    pub fn is_large(&self) -> bool {
        self.flags().contains(PteFlags::PAGE_SIZE)
    }

    /// Physical frame address (low 12 bits cleared)
    pub fn addr(&self) -> u32 {
        self.0 & !PTE_FLAGS_MASK
    }

    /// Raw low 12 bits
    pub fn perm(&self) -> u32 {
        self.0 & PTE_FLAGS_MASK
    }

    pub fn flags(&self) -> PteFlags {
        PteFlags::from_bits_retain(self.perm())
    }
}

/// Base linear address of directory slot `pdx`
#[inline]
pub fn pdx_base(pdx: usize) -> u32 {
    (pdx as u32) << PDXSHIFT
}

/// Linear address of table slot `ptx` under directory slot `pdx`
#[inline]
pub fn pgaddr(pdx: usize, ptx: usize) -> u32 {
    pdx_base(pdx) | ((ptx as u32) << PTXSHIFT)
}
