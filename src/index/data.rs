//! Compact index data units.
//!
//! All data points of an index live in one shared array. Each function
//! owns a contiguous window `points[from..to]` of it, sorted by line in
//! ascending order with unique lines.

use crate::utils::config::MAX_HEAT_LEVEL;
use std::fmt;

/// Identity of a profiled function
///
/// `file` is the base name of the file the function is declared in, so
/// the same function profiled on different machines maps to the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionKey {
    pub package: String,

    /// Receiver type name, empty for free functions
    pub type_name: String,

    pub function: String,

    pub file: String,
}

impl FunctionKey {
    pub fn new(
        package: impl Into<String>,
        type_name: impl Into<String>,
        function: impl Into<String>,
        file: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            type_name: type_name.into(),
            function: function.into(),
            file: file.into(),
        }
    }

    /// Total string bytes held by the key
    pub(crate) fn heap_size(&self) -> usize {
        self.package.len() + self.type_name.len() + self.function.len() + self.file.len()
    }
}

impl fmt::Display for FunctionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.package.is_empty(), self.type_name.is_empty()) {
            (false, false) => write!(f, "{}.({}).{}", self.package, self.type_name, self.function),
            (true, false) => write!(f, "({}).{}", self.type_name, self.function),
            (false, true) => write!(f, "{}.{}", self.package, self.function),
            (true, true) => f.write_str(&self.function),
        }
    }
}

/// Packed local and global heat levels
///
/// Upper 3 bits hold the local level, the next 3 bits the global level.
/// The lower 10 bits are reserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataPointFlags(u16);

impl DataPointFlags {
    const LOCAL_SHIFT: u16 = 16 - 3;
    const GLOBAL_SHIFT: u16 = 16 - 6;
    const LEVEL_MASK: u16 = 0b111;

    pub fn local_level(self) -> u8 {
        ((self.0 >> Self::LOCAL_SHIFT) & Self::LEVEL_MASK) as u8
    }

    pub fn global_level(self) -> u8 {
        ((self.0 >> Self::GLOBAL_SHIFT) & Self::LEVEL_MASK) as u8
    }

    /// # Panics
    /// If `level` is above [`MAX_HEAT_LEVEL`].
    pub fn set_local_level(&mut self, level: u8) {
        self.set_field(Self::LOCAL_SHIFT, level);
    }

    /// # Panics
    /// If `level` is above [`MAX_HEAT_LEVEL`].
    pub fn set_global_level(&mut self, level: u8) {
        self.set_field(Self::GLOBAL_SHIFT, level);
    }

    fn set_field(&mut self, shift: u16, level: u8) {
        assert!(level <= MAX_HEAT_LEVEL, "invalid heat level value: {}", level);
        self.0 &= !(Self::LEVEL_MASK << shift);
        self.0 |= u16::from(level) << shift;
    }
}

/// Aggregated samples of one source line inside one function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataPoint {
    pub line: u32,
    pub flags: DataPointFlags,

    /// Cumulative value: every stack frame at this line contributes
    pub value: i64,

    /// Self value: only innermost frames contribute
    pub flat_value: i64,
}

impl DataPoint {
    pub fn new(line: u32) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }
}

/// Per-function summary record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionRecord {
    /// Index into the sorted file name table
    pub file_id: u32,

    pub min_line: u32,
    pub max_line: u32,

    /// Data window `[data_from, data_to)` in the shared point array
    pub data_from: u32,
    pub data_to: u32,

    pub max_local_level: u8,
    pub max_global_level: u8,
}

impl FunctionRecord {
    pub fn num_points(&self) -> usize {
        (self.data_to - self.data_from) as usize
    }

    pub(crate) fn window(&self) -> std::ops::Range<usize> {
        self.data_from as usize..self.data_to as usize
    }
}

/// Local and global heat levels of a function or a line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HeatLevel {
    pub local: u8,
    pub global: u8,
}

impl HeatLevel {
    pub fn new(local: u8, global: u8) -> Self {
        Self { local, global }
    }
}

/// Query result for a single line
///
/// The zero value means "no data": the line was never sampled or the
/// function is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    pub line: u32,
    pub value: i64,
    pub flat_value: i64,
    pub local_level: u8,
    pub global_level: u8,
}

impl LineStats {
    pub fn heat_level(&self) -> HeatLevel {
        HeatLevel::new(self.local_level, self.global_level)
    }
}

impl From<&DataPoint> for LineStats {
    fn from(pt: &DataPoint) -> Self {
        Self {
            line: pt.line,
            value: pt.value,
            flat_value: pt.flat_value,
            local_level: pt.flags.local_level(),
            global_level: pt.flags.global_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_level_roundtrip() {
        for level in [0, 1, 3, MAX_HEAT_LEVEL] {
            let mut flags = DataPointFlags::default();
            assert_eq!(flags.local_level(), 0);
            assert_eq!(flags.global_level(), 0);

            flags.set_local_level(level);
            assert_eq!(flags.local_level(), level);
            assert_eq!(flags.global_level(), 0);

            flags.set_global_level(level);
            assert_eq!(flags.local_level(), flags.global_level());

            flags.set_local_level(0);
            assert_eq!(flags.local_level(), 0);
            assert_eq!(flags.global_level(), level);

            flags.set_global_level(0);
            assert_eq!(flags, DataPointFlags::default());
        }
    }

    #[test]
    fn test_flags_overwrite() {
        for local in 0..=MAX_HEAT_LEVEL {
            for global in 0..=MAX_HEAT_LEVEL {
                let mut flags = DataPointFlags::default();
                for _ in 0..3 {
                    flags.set_local_level(local);
                    flags.set_global_level(global);
                    assert_eq!(flags.local_level(), local);
                    assert_eq!(flags.global_level(), global);
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "invalid heat level")]
    fn test_flags_reject_level_above_max() {
        let mut flags = DataPointFlags::default();
        flags.set_local_level(MAX_HEAT_LEVEL + 1);
    }

    #[test]
    #[should_panic(expected = "invalid heat level")]
    fn test_flags_reject_global_level_above_max() {
        let mut flags = DataPointFlags::default();
        flags.set_global_level(7);
    }

    #[test]
    fn test_function_key_display() {
        assert_eq!(FunctionKey::new("bytes", "Buffer", "Write", "buffer.go").to_string(), "bytes.(Buffer).Write");
        assert_eq!(FunctionKey::new("main", "", "run", "main.go").to_string(), "main.run");
        assert_eq!(FunctionKey::new("", "T", "m", "t.go").to_string(), "(T).m");
        assert_eq!(FunctionKey::new("", "", "f", "f.go").to_string(), "f");
    }

    #[test]
    fn test_line_stats_from_point() {
        let mut pt = DataPoint::new(42);
        pt.value = 100;
        pt.flat_value = 30;
        pt.flags.set_local_level(4);
        pt.flags.set_global_level(2);

        let stats = LineStats::from(&pt);
        assert_eq!(stats.line, 42);
        assert_eq!(stats.value, 100);
        assert_eq!(stats.flat_value, 30);
        assert_eq!(stats.heat_level(), HeatLevel::new(4, 2));
    }
}
