//! Symbol Resolution
//!
//! Maps an instruction address to its source location and enclosing
//! function. The monitor only consumes this interface; building the table
//! is the kernel image's job.
//!
//! Function names follow the stabs convention: the stored name may carry a
//! type suffix (`i386_init:F(0,25)`), and the record says how many bytes of
//! it are the actual name.

/// Debug information for one instruction address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EipDebugInfo<'a> {
    /// Source file name
    pub file: &'a str,
    /// Source line number
    pub line: u32,
    /// Function name buffer, not terminated at `fn_namelen`
    pub fn_name: &'a str,
    /// Length of the name proper within `fn_name`
    pub fn_namelen: usize,
    /// Start address of the function
    pub fn_addr: usize,
    /// Number of argument words the function takes
    pub fn_narg: usize,
}

impl<'a> EipDebugInfo<'a> {
    /// Function name cut to its recorded length
    pub fn name(&self) -> &'a str {
        self.fn_name.get(..self.fn_namelen).unwrap_or(self.fn_name)
    }
}

/// Address to debug-info lookup
pub trait SymbolResolver {
    /// Resolve `addr`, or `None` if it is not inside known code
    fn debuginfo(&self, addr: usize) -> Option<EipDebugInfo<'_>>;
}

/// One function in a [`SymbolTable`]
#[derive(Debug, Clone, Copy)]
pub struct FuncSym<'a> {
    /// First byte of the function
    pub start: usize,
    /// One past the last byte
    pub end: usize,
    /// Stabs-style name, possibly with a `:type` suffix
    pub name: &'a str,
    pub file: &'a str,
    /// Line of the function header
    pub line: u32,
    pub narg: usize,
    /// `(offset, line)` pairs sorted by offset
    pub lines: &'a [(usize, u32)],
}

impl FuncSym<'_> {
    fn contains(&self, addr: usize) -> bool {
        self.start <= addr && addr < self.end
    }

    fn namelen(&self) -> usize {
        self.name.find(':').unwrap_or(self.name.len())
    }

    /// Source line for an address inside this function
    fn line_at(&self, addr: usize) -> u32 {
        let offset = addr - self.start;
        let idx = self.lines.partition_point(|&(off, _)| off <= offset);
        if idx == 0 {
            self.line
        } else {
            self.lines[idx - 1].1
        }
    }
}

/// Resolver over a static table of functions sorted by start address
pub struct SymbolTable<'a> {
    funcs: &'a [FuncSym<'a>],
}

impl<'a> SymbolTable<'a> {
    pub const fn new(funcs: &'a [FuncSym<'a>]) -> Self {
        Self { funcs }
    }

    fn lookup(&self, addr: usize) -> Option<&FuncSym<'a>> {
        let idx = self.funcs.partition_point(|f| f.start <= addr);
        if idx == 0 {
            return None;
        }
        let func = &self.funcs[idx - 1];
        if func.contains(addr) {
            Some(func)
        } else {
            None
        }
    }
}

impl SymbolResolver for SymbolTable<'_> {
    fn debuginfo(&self, addr: usize) -> Option<EipDebugInfo<'_>> {
        let func = self.lookup(addr)?;
        Some(EipDebugInfo {
            file: func.file,
            line: func.line_at(addr),
            fn_name: func.name,
            fn_namelen: func.namelen(),
            fn_addr: func.start,
            fn_narg: func.narg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FUNCS: [FuncSym<'static>; 3] = [
        FuncSym {
            start: 0xf010_0000,
            end: 0xf010_0040,
            name: "test_backtrace:F(0,25)",
            file: "kern/init.c",
            line: 13,
            narg: 1,
            lines: &[(0x0, 13), (0x10, 15), (0x28, 17)],
        },
        FuncSym {
            start: 0xf010_0040,
            end: 0xf010_00a0,
            name: "i386_init:F(0,25)",
            file: "kern/init.c",
            line: 24,
            narg: 0,
            lines: &[],
        },
        // Gap between 0xf01000a0 and 0xf0100100
        FuncSym {
            start: 0xf010_0100,
            end: 0xf010_0180,
            name: "mon_backtrace",
            file: "kern/monitor.c",
            line: 90,
            narg: 3,
            lines: &[(0x8, 91)],
        },
    ];

    #[test]
    fn test_resolves_function_and_line() {
        let table = SymbolTable::new(&FUNCS);
        let info = table.debuginfo(0xf010_0012).unwrap();
        assert_eq!(info.file, "kern/init.c");
        assert_eq!(info.line, 15);
        assert_eq!(info.name(), "test_backtrace");
        assert_eq!(info.fn_addr, 0xf010_0000);
        assert_eq!(info.fn_narg, 1);
    }

    #[test]
    fn test_line_falls_back_to_header() {
        let table = SymbolTable::new(&FUNCS);
        assert_eq!(table.debuginfo(0xf010_0050).unwrap().line, 24);
        assert_eq!(table.debuginfo(0xf010_0104).unwrap().line, 90);
        assert_eq!(table.debuginfo(0xf010_0108).unwrap().line, 91);
    }

    #[test]
    fn test_name_without_suffix() {
        let table = SymbolTable::new(&FUNCS);
        let info = table.debuginfo(0xf010_0100).unwrap();
        assert_eq!(info.fn_namelen, "mon_backtrace".len());
        assert_eq!(info.name(), "mon_backtrace");
    }

    #[test]
    fn test_unresolved_addresses() {
        let table = SymbolTable::new(&FUNCS);
        assert!(table.debuginfo(0xf00f_ffff).is_none());
        assert!(table.debuginfo(0xf010_00a0).is_none());
        assert!(table.debuginfo(0xf010_0180).is_none());
        assert!(SymbolTable::new(&[]).debuginfo(0xf010_0000).is_none());
    }

    #[test]
    fn test_bad_namelen_uses_whole_buffer() {
        let info = EipDebugInfo {
            file: "kern/init.c",
            line: 1,
            fn_name: "short",
            fn_namelen: 64,
            fn_addr: 0,
            fn_narg: 0,
        };
        assert_eq!(info.name(), "short");
    }
}
