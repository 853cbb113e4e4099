use atomic_float::AtomicF32;
use nalgebra::Vector3;
use rayon::prelude::*;
use std::cell::UnsafeCell;
use std::sync::Mutex;
use std::sync::atomic::Ordering;

const LOCK_STRIPES: usize = 1024;

/// Supersampled color and depth buffers.
/// Thread-safe for parallel rendering using atomic depth and striped locking for color.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    /// Samples per pixel along each axis.
    pub sample_count: usize,
    pub buffer_width: usize,
    pub buffer_height: usize,

    /// Color samples. Writers hold the stripe lock of the sample they touch.
    color_buffer: UnsafeCell<Vec<Vector3<f32>>>,
    depth_buffer: Vec<AtomicF32>,
    locks: Vec<Mutex<()>>,
}

// Color writes go through the striped locks, depth through atomics.
unsafe impl Sync for FrameBuffer {}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        let sample_count = sample_count.max(1);
        let buffer_width = width * sample_count;
        let buffer_height = height * sample_count;
        let size = buffer_width * buffer_height;

        Self {
            width,
            height,
            sample_count,
            buffer_width,
            buffer_height,
            color_buffer: UnsafeCell::new(vec![Vector3::zeros(); size]),
            depth_buffer: (0..size).map(|_| AtomicF32::new(f32::INFINITY)).collect(),
            locks: (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Fills every sample with `background` and resets depth to infinity.
    pub fn clear(&mut self, background: Vector3<f32>) {
        self.color_buffer
            .get_mut()
            .par_iter_mut()
            .for_each(|c| *c = background);
        self.depth_buffer
            .par_iter()
            .for_each(|d| d.store(f32::INFINITY, Ordering::Relaxed));
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.buffer_width && y < self.buffer_height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.buffer_width + x
    }

    /// Atomically keeps the smaller depth. Returns true if `depth` won.
    #[inline]
    pub fn depth_test_and_update(&self, x: usize, y: usize, depth: f32) -> bool {
        if !self.in_bounds(x, y) || !depth.is_finite() {
            return false;
        }
        let previous = self.depth_buffer[self.index(x, y)].fetch_min(depth, Ordering::AcqRel);
        depth < previous
    }

    /// Writes `color` blended over the stored sample with coverage `alpha`.
    /// Should only be called after `depth_test_and_update` returned true.
    #[inline]
    pub fn blend_pixel(&self, x: usize, y: usize, color: Vector3<f32>, alpha: f32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        // A poisoned stripe only means another writer panicked; the data is plain floats.
        let _guard = self.locks[idx % self.locks.len()]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // SAFETY: the stripe lock for `idx` is held.
        unsafe {
            let buffer = &mut *self.color_buffer.get();
            buffer[idx] = if alpha >= 1.0 {
                color
            } else {
                buffer[idx] * (1.0 - alpha) + color * alpha
            };
        }
    }

    #[inline]
    pub fn set_pixel(&self, x: usize, y: usize, color: Vector3<f32>) {
        self.blend_pixel(x, y, color, 1.0);
    }

    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        self.in_bounds(x, y)
            .then(|| self.depth_buffer[self.index(x, y)].load(Ordering::Relaxed))
    }

    /// Resolved color of output pixel `(x, y)` (box filter over its samples).
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Vector3<f32>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        // SAFETY: only read between frames, when no writer is active.
        let buffer = unsafe { &*self.color_buffer.get() };

        let start_x = x * self.sample_count;
        let start_y = y * self.sample_count;
        let mut sum = Vector3::zeros();
        for dy in 0..self.sample_count {
            for dx in 0..self.sample_count {
                sum += buffer[self.index(start_x + dx, start_y + dy)];
            }
        }
        Some(sum / (self.sample_count * self.sample_count) as f32)
    }
}
