use ndarray::ArrayView3;

use crate::shared::face_box::FaceBox;

/// A single still or camera frame: contiguous RGB bytes in row-major order.
///
/// Camera and codec layers convert to RGB at their boundary; the rest of the
/// pipeline never sees BGR or YUV data.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Sequence number within a live session; 0 for uploads and snapshots.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Copies the part of the frame covered by `face_box`, clamped to the
    /// frame bounds. Returns `None` when the clamped box is empty.
    pub fn crop(&self, face_box: &FaceBox) -> Option<Frame> {
        let clamped = face_box.clamp_to(self.width, self.height)?;
        let channels = self.channels as usize;
        let x0 = clamped.x as usize;
        let y0 = clamped.y as usize;
        let w = clamped.width as usize;
        let h = clamped.height as usize;
        let stride = self.width as usize * channels;

        let mut data = Vec::with_capacity(w * h * channels);
        for row in y0..y0 + h {
            let start = row * stride + x0 * channels;
            data.extend_from_slice(&self.data[start..start + w * channels]);
        }
        Some(Frame::new(
            data,
            w as u32,
            h as u32,
            self.channels,
            self.index,
        ))
    }

    /// Expands RGB pixels to RGBA with full opacity, as GUI image handles expect.
    pub fn to_rgba(&self) -> Vec<u8> {
        if self.channels == 4 {
            return self.data.clone();
        }
        let mut rgba = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for px in self.data.chunks_exact(self.channels as usize) {
            rgba.extend_from_slice(&px[..3]);
            rgba.push(u8::MAX);
        }
        rgba
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
