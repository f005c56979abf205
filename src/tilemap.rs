use crate::error::IslandError;

/// Largest grid the generators will allocate.
pub const MAX_CELLS: usize = 1 << 28;

/// A bounded, row-major 2D grid. Edges do not wrap.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

/// Terrain elevation grid handed to renderers and exporters.
pub type HeightGrid = Tilemap<f32>;

/// Check grid dimensions before anything is allocated.
pub fn check_dimensions(width: usize, height: usize) -> Result<usize, IslandError> {
    if width == 0 {
        return Err(IslandError::invalid("width", 0.0, "must be at least 1"));
    }
    if height == 0 {
        return Err(IslandError::invalid("height", 0.0, "must be at least 1"));
    }
    match width.checked_mul(height) {
        Some(cells) if cells <= MAX_CELLS => Ok(cells),
        _ => Err(IslandError::ResourceLimitExceeded {
            resource: "grid cells",
            requested: width.saturating_mul(height),
            limit: MAX_CELLS,
        }),
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Tilemap<T> {
    /// Wrap an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, IslandError> {
        let cells = check_dimensions(width, height)?;
        if data.len() != cells {
            return Err(IslandError::Persistence(format!(
                "expected {} cells for a {}x{} grid, found {}",
                cells,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat row-major view, `y * width + x`.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            (idx % width, idx / width, val)
        })
    }
}

impl Tilemap<f32> {
    /// Minimum and maximum value in the grid.
    pub fn range(&self) -> (f32, f32) {
        let mut min_h = f32::MAX;
        let mut max_h = f32::MIN;
        for &h in &self.data {
            if h < min_h { min_h = h; }
            if h > max_h { max_h = h; }
        }
        (min_h, max_h)
    }

    /// Copy of the grid rescaled to 0.0-1.0.
    pub fn normalized(&self) -> Self {
        let (min_h, max_h) = self.range();
        let span = max_h - min_h;
        let data = if span > f32::EPSILON {
            self.data.iter().map(|&h| (h - min_h) / span).collect()
        } else {
            vec![0.5; self.data.len()]
        };
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }
}
