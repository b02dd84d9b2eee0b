/// Per-pixel record of the nearest view-space depth drawn so far.
///
/// Starts at `+inf` everywhere; smaller values are closer to the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl DepthBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![f32::INFINITY; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self) {
        self.data.fill(f32::INFINITY);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        (x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32)
            .then(|| (y as u32 * self.width + x as u32) as usize)
    }

    /// The stored depth, or `None` outside the buffer.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.data[i])
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, depth: f32) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = depth;
        }
    }

    /// Stores `depth` if it is strictly nearer than what is recorded.
    ///
    /// Returns whether the write happened. Ties keep the earlier surface.
    #[inline]
    pub fn test_and_set(&mut self, x: i32, y: i32, depth: f32) -> bool {
        match self.index(x, y) {
            Some(i) if self.data[i] > depth => {
                self.data[i] = depth;
                true
            }
            _ => false,
        }
    }
}
