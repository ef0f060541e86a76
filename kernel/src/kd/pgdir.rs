//! Page Directory Dump
//!
//! Lists the present slots of the top-level page directory:
//!
//! ```text
//!  pdx	va		pa		perm
//!    0	00000000	00000000	027 PWU--A---
//!  960	f0000000	003ff000	063 PW---AD--
//! ```
//!
//! Absent slots are skipped; a sparse directory is the normal case. With
//! `-l` each directory row is followed by the present entries of its page
//! table, read through the kernel's physical memory window.

use core::fmt::{self, Write};

use crate::mm::{kaddr, pdx_base, pgaddr, BadAddress, MemoryReader, Pde, NPDENTRIES, NPTENTRIES};

/// A present directory slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// Directory index
    pub pdx: usize,
    /// First linear address covered by the slot
    pub va: u32,
    /// Physical address from the entry
    pub pa: u32,
    /// Low 12 bits of the entry
    pub perm: u32,
}

impl Mapping {
    fn from_entry(pdx: usize, entry: &Pde) -> Self {
        Self {
            pdx,
            va: pdx_base(pdx),
            pa: entry.addr(),
            perm: entry.perm(),
        }
    }

    fn letters(&self) -> crate::mm::FlagLetters {
        Pde::from_raw(self.perm).flags().letters()
    }
}

/// Present slots of `pgdir`, in index order
pub fn present_entries(pgdir: &[Pde]) -> impl Iterator<Item = (Mapping, Pde)> + '_ {
    pgdir
        .iter()
        .take(NPDENTRIES)
        .enumerate()
        .filter(|(_, entry)| entry.is_present())
        .map(|(pdx, entry)| (Mapping::from_entry(pdx, entry), *entry))
}

fn print_row(out: &mut dyn Write, m: &Mapping) -> fmt::Result {
    writeln!(
        out,
        "{:4}\t{:08x}\t{:08x}\t{:03x} {}",
        m.pdx,
        m.va,
        m.pa,
        m.perm,
        m.letters()
    )
}

/// Print every present directory slot
pub fn print_pgdir(out: &mut dyn Write, pgdir: &[Pde]) -> fmt::Result {
    writeln!(out, " pdx\tva\t\tpa\t\tperm")?;
    for (mapping, _) in present_entries(pgdir) {
        print_row(out, &mapping)?;
    }
    Ok(())
}

/// Print every present directory slot followed by its present page table
/// entries
///
/// 4MB pages have no page table and print only the directory row. A page
/// table that cannot be read, or that lies above the physical window at
/// `KERNBASE`, is reported and skipped.
pub fn print_pgdir_leaves(
    out: &mut dyn Write,
    pgdir: &[Pde],
    mem: &dyn MemoryReader,
) -> fmt::Result {
    writeln!(out, " pdx\t ptx\tva\t\tpa\t\tperm")?;
    for (mapping, entry) in present_entries(pgdir) {
        print_row(out, &mapping)?;
        if entry.is_large() {
            continue;
        }

        let Some(table) = kaddr(entry.addr()) else {
            log::warn!("pgdir: page table for pdx {} outside the kernel window", mapping.pdx);
            writeln!(out, "<leaf table unreadable at {:x}>", entry.addr())?;
            continue;
        };
        for ptx in 0..NPTENTRIES {
            let pte = match table
                .checked_add(ptx * 4)
                .ok_or(BadAddress(table))
                .and_then(|slot| mem.read_u32(slot))
            {
                Ok(raw) => Pde::from_raw(raw),
                Err(err) => {
                    log::warn!("pgdir: page table for pdx {} unreadable", mapping.pdx);
                    writeln!(out, "<leaf table unreadable at {:x}>", err.0)?;
                    break;
                }
            };
            if !pte.is_present() {
                continue;
            }
            writeln!(
                out,
                "{:4}\t{:4}\t{:08x}\t{:08x}\t{:03x} {}",
                mapping.pdx,
                ptx,
                pgaddr(mapping.pdx, ptx),
                pte.addr(),
                pte.perm(),
                pte.flags().letters()
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kd::testing::SparseMemory;
    use crate::mm::KERNBASE;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    fn directory() -> Vec<Pde> {
        let mut pgdir = vec![Pde::empty(); NPDENTRIES];
        pgdir[0] = Pde::new(0x0011_8000, 0x027);
        pgdir[5] = Pde::new(0x0200_0000, 0x083);
        // Flags without PRESENT must not show up
        pgdir[7] = Pde::new(0x0030_0000, 0x006);
        pgdir
    }

    #[test]
    fn test_two_present_slots() {
        let mut out = String::new();
        print_pgdir(&mut out, &directory()).unwrap();
        assert_eq!(
            out,
            " pdx\tva\t\tpa\t\tperm\n   \
             0\t00000000\t00118000\t027 PWU--A---\n   \
             5\t01400000\t02000000\t083 PW-----S-\n"
        );
    }

    #[test]
    fn test_present_entries() {
        let pgdir = directory();
        let mappings: Vec<Mapping> = present_entries(&pgdir).map(|(m, _)| m).collect();
        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0], Mapping { pdx: 0, va: 0, pa: 0x0011_8000, perm: 0x027 });
        assert_eq!(mappings[1], Mapping { pdx: 5, va: 5 << 22, pa: 0x0200_0000, perm: 0x083 });
    }

    #[test]
    fn test_empty_directory() {
        let mut out = String::new();
        print_pgdir(&mut out, &vec![Pde::empty(); NPDENTRIES]).unwrap();
        assert_eq!(out, " pdx\tva\t\tpa\t\tperm\n");
    }

    #[test]
    fn test_last_slot() {
        let mut pgdir = vec![Pde::empty(); NPDENTRIES];
        pgdir[NPDENTRIES - 1] = Pde::new(0x003f_f000, 0x003);
        let mut out = String::new();
        print_pgdir(&mut out, &pgdir).unwrap();
        assert!(out.ends_with("1023\tffc00000\t003ff000\t003 PW-------\n"));
    }

    #[test]
    fn test_leaf_tables() {
        let pgdir = directory();
        let table = KERNBASE + 0x0011_8000;
        let mut mem = SparseMemory::new();
        for ptx in 0..NPTENTRIES {
            mem.set_u32(table + ptx * 4, 0);
        }
        mem.set_u32(table + 4, 0x0000_1000 | 0x003);
        mem.set_u32(table + 0x3ff * 4, 0x000b_8000 | 0x01b);

        let mut out = String::new();
        print_pgdir_leaves(&mut out, &pgdir, &mem).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            [
                " pdx\t ptx\tva\t\tpa\t\tperm",
                "   0\t00000000\t00118000\t027 PWU--A---",
                "   0\t   1\t00001000\t00001000\t003 PW-------",
                "   0\t1023\t003ff000\t000b8000\t01b PW-TC----",
                "   5\t01400000\t02000000\t083 PW-----S-",
            ]
        );
    }

    #[test]
    fn test_unreadable_leaf_table() {
        let mut pgdir = vec![Pde::empty(); NPDENTRIES];
        pgdir[2] = Pde::new(0x0040_0000, 0x007);
        pgdir[3] = Pde::new(0x0080_0000, 0x083);
        let mem = SparseMemory::new();

        let mut out = String::new();
        print_pgdir_leaves(&mut out, &pgdir, &mem).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], alloc::format!("<leaf table unreadable at {:x}>", KERNBASE + 0x0040_0000));
        assert!(lines[3].starts_with("   3\t00c00000"));
    }

    #[test]
    fn test_leaf_table_above_window() {
        let mut pgdir = vec![Pde::empty(); NPDENTRIES];
        pgdir[1] = Pde::new(0xfe00_0000, 0x003);
        pgdir[4] = Pde::new(0x0000_2000, 0x003);
        let mut mem = SparseMemory::new();
        for ptx in 0..NPTENTRIES {
            mem.set_u32(KERNBASE + 0x2000 + ptx * 4, 0);
        }
        mem.set_u32(KERNBASE + 0x2000, 0x0000_5000 | 0x001);

        let mut out = String::new();
        print_pgdir_leaves(&mut out, &pgdir, &mem).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            [
                " pdx\t ptx\tva\t\tpa\t\tperm",
                "   1\t00400000\tfe000000\t003 PW-------",
                "<leaf table unreadable at fe000000>",
                "   4\t01000000\t00002000\t003 PW-------",
                "   4\t   0\t01000000\t00005000\t001 P--------",
            ]
        );
    }
}
