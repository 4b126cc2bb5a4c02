use serde::Serialize;

/// Grid cell edge, in pixels.
pub const CELL_SIZE: usize = 50;
/// Regions emitted per category, at most.
pub const MAX_REGIONS: usize = 10;
/// A cell needs more than this many hits to become a region.
const MIN_CELL_HITS: u32 = 2;
const SIZE_PER_HIT: u32 = 5;
const MAX_REGION_SIZE: u32 = 80;

/// Coarse cluster of matching pixels, for overlays only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    /// Cell center, in frame pixels.
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

/// Flat hit-count grid over the frame, reused between frames.
#[derive(Debug, Default)]
pub(crate) struct ClusterGrid {
    cols: usize,
    rows: usize,
    counts: Vec<u32>,
    // cells in first-hit order
    touched: Vec<u32>,
}

impl ClusterGrid {
    pub fn reset(&mut self, width: usize, height: usize) {
        self.cols = width.div_ceil(CELL_SIZE);
        self.rows = height.div_ceil(CELL_SIZE);
        let cell_count = self.cols * self.rows;

        if self.counts.len() == cell_count {
            for &cell in &self.touched {
                self.counts[cell as usize] = 0;
            }
        } else {
            self.counts.clear();
            self.counts.resize(cell_count, 0);
        }
        self.touched.clear();
    }

    pub fn add(&mut self, x: usize, y: usize) {
        let cell = (y / CELL_SIZE) * self.cols + x / CELL_SIZE;
        debug_assert!(cell < self.counts.len());

        let count = &mut self.counts[cell];
        if *count == 0 {
            self.touched.push(cell as u32);
        }
        *count += 1;
    }

    pub fn regions(&self) -> Vec<Region> {
        self.touched
            .iter()
            .filter_map(|&cell| {
                let count = self.counts[cell as usize];
                (count > MIN_CELL_HITS).then(|| {
                    let cell = cell as usize;
                    Region {
                        x: ((cell % self.cols) * CELL_SIZE + CELL_SIZE / 2) as u32,
                        y: ((cell / self.cols) * CELL_SIZE + CELL_SIZE / 2) as u32,
                        size: (count * SIZE_PER_HIT).min(MAX_REGION_SIZE),
                    }
                })
            })
            .take(MAX_REGIONS)
            .collect()
    }
}
