/// Maximum disparity in pixels at full depth (255) and unit multiplier.
pub const MAX_DISPARITY_PX: u32 = 15;

/// Precomputed depth value -> horizontal shift mapping.
///
/// `table[v] = floor(MAX_DISPARITY_PX * v * depth_multiplier / 255)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftTable {
    table: [u32; 256],
}

impl ShiftTable {
    /// Build the table for a multiplier. Negative or non-finite multipliers yield zero shifts;
    /// callers validate parameters beforehand.
    pub fn build(depth_multiplier: f64) -> Self {
        let mut table = [0u32; 256];
        for (v, slot) in table.iter_mut().enumerate() {
            let shift = (f64::from(MAX_DISPARITY_PX) * v as f64 * depth_multiplier / 255.0).floor();
            *slot = shift as u32;
        }
        Self { table }
    }

    /// Shift in pixels for a depth value.
    #[inline]
    pub fn shift(&self, depth: u8) -> u32 {
        self.table[usize::from(depth)]
    }

    /// The full table, indexed by depth value.
    pub fn as_slice(&self) -> &[u32; 256] {
        &self.table
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/shift.rs"]
mod tests;
