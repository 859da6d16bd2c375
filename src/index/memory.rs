//! Approximate memory footprint of a populated index.

use super::data::{DataPoint, FunctionKey, FunctionRecord};
use super::heatmap::Index;
use std::mem::size_of;

impl Index {
    /// Rough estimate of the heap bytes held by the index
    ///
    /// Counts the key table, the point array, the function records and the
    /// file name table, including string contents. This is a diagnostic
    /// number, not an exact accounting of allocator usage.
    pub fn memory_usage_approx(&self) -> usize {
        let Some(data) = self.data() else {
            return 0;
        };

        let mut size = 0;

        // Key table entries, and the strings their keys own.
        size += data.func_ids.capacity() * (size_of::<FunctionKey>() + size_of::<u32>());
        size += data.func_ids.keys().map(FunctionKey::heap_size).sum::<usize>();

        size += data.points.capacity() * size_of::<DataPoint>();

        // Records plus the per-record key copy used for traversal.
        size += data.funcs.capacity() * size_of::<FunctionRecord>();
        size += data.keys.capacity() * size_of::<FunctionKey>();
        size += data.keys.iter().map(FunctionKey::heap_size).sum::<usize>();

        size += data.file_names.capacity() * size_of::<String>();
        size += data.file_names.iter().map(String::len).sum::<usize>();

        size
    }
}
