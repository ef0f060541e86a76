//! Frame Pointer Access
//!
//! The kernel is built with `-C force-frame-pointers=yes`, so every
//! activation starts with `push rbp; mov rbp, rsp`:
//!
//! ```text
//! [rbp + 8]  return address into the caller
//! [rbp]      caller's saved rbp
//! [rbp - 8]  first spilled local / argument slot
//! ```

use core::arch::asm;

use crate::kd::StackStart;

/// Current value of rbp
#[inline(always)]
pub fn read_rbp() -> usize {
    let rbp: usize;
    unsafe {
        asm!("mov {}, rbp", out(reg) rbp, options(nomem, nostack, preserves_flags));
    }
    rbp
}

/// Frame pointer and return address of the function that called this one
///
/// Must stay out of line: it reads its own rbp and steps one frame out, so
/// the starting point is the caller's activation rather than ours.
#[inline(never)]
pub fn caller_frame() -> Option<StackStart> {
    let rbp = read_rbp();
    if rbp == 0 {
        return None;
    }
    // SAFETY: rbp is this function's own frame pointer, and the word it
    // points at was pushed by our prologue.
    let fp = unsafe { core::ptr::read_volatile(rbp as *const usize) };
    if fp == 0 {
        return None;
    }
    // SAFETY: fp is the live frame of our caller, which is still on the stack.
    let ret = unsafe { core::ptr::read_volatile((fp as *const usize).add(1)) };
    Some(StackStart::new(fp, ret))
}
