//! Memory Inspection (mm)
//!
//! Read-only views of kernel memory used by the monitor:
//!
//! - **pde**: Page directory entry format and permission bits
//! - **MemoryReader**: checked word reads, so a corrupt pointer turns into
//!   an error value instead of a page fault
//!
//! Every dereference the monitor performs on live state goes through a
//! [`MemoryReader`]. The live implementation, [`KernelMemory`], only touches
//! addresses inside an explicit list of readable regions.

pub mod pde;

pub use pde::*;

use core::mem::size_of;
use core::ops::Range;

/// Virtual base of the kernel's physical memory window
pub const KERNBASE: usize = 0xF000_0000;

/// Bytes of physical memory mapped at [`KERNBASE`] (up to the 4GB line)
pub const KERNWINDOW: usize = 0x1000_0000;

/// Size of a machine word in bytes
pub const WORD_SIZE: usize = size_of::<usize>();

/// A read touched memory that is not known to be readable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadAddress(pub usize);

/// Checked access to memory
pub trait MemoryReader {
    /// Read the machine word at `addr`
    fn read_word(&self, addr: usize) -> Result<usize, BadAddress>;

    /// Read the 32-bit value at `addr`
    fn read_u32(&self, addr: usize) -> Result<u32, BadAddress>;
}

/// Reader over the live address space, limited to known regions
pub struct KernelMemory<'a> {
    regions: &'a [Range<usize>],
}

impl<'a> KernelMemory<'a> {
    pub const fn new(regions: &'a [Range<usize>]) -> Self {
        Self { regions }
    }

    /// Check that `len` bytes at `addr` are aligned and inside one region
    fn check(&self, addr: usize, len: usize) -> Result<(), BadAddress> {
        if addr == 0 || addr % len != 0 {
            return Err(BadAddress(addr));
        }
        let end = addr.checked_add(len).ok_or(BadAddress(addr))?;
        if self
            .regions
            .iter()
            .any(|r| r.start <= addr && end <= r.end)
        {
            Ok(())
        } else {
            Err(BadAddress(addr))
        }
    }
}

impl MemoryReader for KernelMemory<'_> {
    fn read_word(&self, addr: usize) -> Result<usize, BadAddress> {
        self.check(addr, WORD_SIZE)?;
        // SAFETY: the address is aligned and lies in a region the kernel
        // declared readable when it entered the monitor.
        Ok(unsafe { core::ptr::read_volatile(addr as *const usize) })
    }

    fn read_u32(&self, addr: usize) -> Result<u32, BadAddress> {
        self.check(addr, size_of::<u32>())?;
        // SAFETY: as above.
        Ok(unsafe { core::ptr::read_volatile(addr as *const u32) })
    }
}

/// Kernel virtual address of a physical address in the KERNBASE window
///
/// `None` if `pa` lies above the window.
#[inline]
pub fn kaddr(pa: u32) -> Option<usize> {
    let pa = pa as usize;
    if pa >= KERNWINDOW {
        return None;
    }
    KERNBASE.checked_add(pa)
}
