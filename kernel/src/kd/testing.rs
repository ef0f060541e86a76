//! Host-side doubles for monitor tests

use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::config::MonitorConfig;
use crate::mm::{BadAddress, MemoryReader, Pde, NPDENTRIES, WORD_SIZE};

use super::{FuncSym, KdEnv, KernelLayout, LineReader, StackStart, SymbolTable, COMMANDS};

/// Memory holding only the words and u32s explicitly stored
#[derive(Default)]
pub struct SparseMemory {
    words: BTreeMap<usize, usize>,
    dwords: BTreeMap<usize, u32>,
}

impl SparseMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_word(&mut self, addr: usize, value: usize) {
        self.words.insert(addr, value);
    }

    pub fn set_u32(&mut self, addr: usize, value: u32) {
        self.dwords.insert(addr, value);
    }

    pub fn remove(&mut self, addr: usize) {
        self.words.remove(&addr);
        self.dwords.remove(&addr);
    }
}

impl MemoryReader for SparseMemory {
    fn read_word(&self, addr: usize) -> Result<usize, BadAddress> {
        self.words.get(&addr).copied().ok_or(BadAddress(addr))
    }

    fn read_u32(&self, addr: usize) -> Result<u32, BadAddress> {
        self.dwords.get(&addr).copied().ok_or(BadAddress(addr))
    }
}

/// Feeds a fixed list of lines; `None` entries simulate "no input"
pub struct ScriptedReader {
    lines: VecDeque<Option<Vec<u8>>>,
    current: Vec<u8>,
    reads: usize,
}

impl ScriptedReader {
    pub fn new(lines: &[Option<&str>]) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|line| line.map(|s| s.as_bytes().to_vec()))
                .collect(),
            current: Vec::new(),
            reads: 0,
        }
    }

    /// Number of read_line calls so far
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self) -> Option<&mut [u8]> {
        self.reads += 1;
        let line = self.lines.pop_front().expect("monitor read past end of script")?;
        self.current = line;
        Some(self.current.as_mut_slice())
    }
}

static FUNCS: [FuncSym<'static>; 2] = [
    FuncSym {
        start: 0x10_0000,
        end: 0x10_0100,
        name: "test_backtrace:F(0,25)",
        file: "kern/init.c",
        line: 13,
        narg: 1,
        lines: &[(0x0, 13), (0x10, 16)],
    },
    FuncSym {
        start: 0x10_0100,
        end: 0x10_0200,
        name: "i386_init:F(0,25)",
        file: "kern/init.c",
        line: 24,
        narg: 0,
        lines: &[],
    },
];

/// Everything a [`KdEnv`] borrows, owned in one place
pub struct Fixture {
    pub memory: SparseMemory,
    pub symbols: SymbolTable<'static>,
    pub pgdir: Vec<Pde>,
    pub layout: KernelLayout,
    pub config: MonitorConfig,
    pub stack_origin: Option<StackStart>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            memory: SparseMemory::new(),
            symbols: SymbolTable::new(&FUNCS),
            pgdir: vec![Pde::empty(); NPDENTRIES],
            layout: KernelLayout {
                entry: 0xf010_000c,
                etext: 0xf010_1a3d,
                edata: 0xf011_3300,
                end: 0xf011_3960,
                kernbase: 0xf000_0000,
            },
            config: MonitorConfig::new(),
            stack_origin: None,
        }
    }

    /// Two frames at 0x1000 and 0x1100, the outer one terminating the chain
    pub fn with_stack() -> Self {
        let mut fixture = Self::new();
        let mem = &mut fixture.memory;
        mem.set_word(0x1000, 0x1100);
        mem.set_word(0x1000 + WORD_SIZE, 0x10_0010);
        mem.set_word(0x1000 - WORD_SIZE, 0xa);
        mem.set_word(0x1100, 0);
        mem.set_word(0x1100 + WORD_SIZE, 0x10_0120);
        fixture.stack_origin = Some(StackStart::new(0x1000, 0x10_0010));
        fixture
    }

    pub fn env<'a>(&'a self, out: &'a mut dyn Write) -> KdEnv<'a> {
        KdEnv {
            out,
            commands: &COMMANDS,
            memory: &self.memory,
            symbols: &self.symbols,
            pgdir: &self.pgdir,
            layout: self.layout,
            config: &self.config,
            stack_origin: self.stack_origin,
        }
    }
}
