use huetune_image::{Image, ImageError, ImageSize};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::capture::Parameters;
use v4l::video::Capture;
use v4l::{Device, FourCC, Timestamp};

/// Error types for the v4l module.
#[derive(Debug, thiserror::Error)]
pub enum V4lError {
    /// Failed to create an image
    #[error(transparent)]
    ImageError(#[from] ImageError),

    /// Failed to talk to the device
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// The device negotiated a pixel format this module cannot decode
    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(PixelFormat),

    /// The captured buffer is too small for the negotiated frame size
    #[error("Buffer of {0} bytes is too small for a {1}x{2} YUYV frame")]
    InvalidBufferSize(usize, usize, usize),
}

/// Supported camera pixel formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// YUYV 4:2:2 format (uncompressed, good quality, high bandwidth)
    YUYV,
    /// Custom format specified by FourCC bytes
    Custom([u8; 4]),
}

impl PixelFormat {
    /// Convert to V4L2 FourCC
    pub fn to_fourcc(&self) -> FourCC {
        match self {
            Self::YUYV => FourCC::new(b"YUYV"),
            Self::Custom(bytes) => FourCC::new(bytes),
        }
    }

    /// Create PixelFormat from V4L2 FourCC
    pub fn from_fourcc(fourcc: FourCC) -> Self {
        match fourcc.str() {
            Ok("YUYV") => Self::YUYV,
            _ => {
                let bytes = [
                    fourcc.repr[0],
                    fourcc.repr[1],
                    fourcc.repr[2],
                    fourcc.repr[3],
                ];
                Self::Custom(bytes)
            }
        }
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::YUYV
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YUYV => write!(f, "YUYV"),
            Self::Custom(bytes) => {
                let fourcc_str = std::str::from_utf8(bytes).unwrap_or("????");
                write!(f, "{fourcc_str}")
            }
        }
    }
}

/// Configuration for V4L video capture.
pub struct V4lCameraConfig {
    /// The camera device index (`/dev/video<index>`)
    pub camera_id: usize,
    /// The desired image size
    pub size: ImageSize,
    /// The desired frames per second
    pub fps: u32,
}

impl Default for V4lCameraConfig {
    fn default() -> Self {
        Self {
            camera_id: 0,
            size: ImageSize {
                width: 640,
                height: 480,
            },
            fps: 30,
        }
    }
}

/// Represents a captured frame
pub struct EncodedFrame<'a> {
    /// The buffer of the frame
    pub buffer: &'a [u8],
    /// The pixel format of the frame
    pub pixel_format: PixelFormat,
    /// The timestamp of the frame
    pub timestamp: Timestamp,
    /// The sequence number of the frame
    pub sequence: u32,
}

/// V4L video capture.
///
/// Owns the camera device handle; the device is released when the capture
/// object is dropped.
pub struct V4lVideoCapture {
    stream: MmapStream<'static>,
    pixel_format: PixelFormat,
    size: ImageSize,
    #[allow(dead_code)]
    device: Device,
}

impl V4lVideoCapture {
    /// Create a new V4L video capture.
    ///
    /// Negotiates the requested size and frame rate with the driver and
    /// starts a memory-mapped capture stream. Fails if the device cannot be
    /// opened or only offers a pixel format this module cannot decode.
    pub fn new(config: V4lCameraConfig) -> Result<Self, V4lError> {
        let device = Device::new(config.camera_id)?;

        // Request the format
        let mut format = device.format()?;
        format.width = config.size.width as u32;
        format.height = config.size.height as u32;
        format.fourcc = PixelFormat::YUYV.to_fourcc();

        device.set_format(&format)?;

        // Verify the format was actually set (camera might not support it)
        let actual_format = device.format()?;
        let pixel_format = PixelFormat::from_fourcc(actual_format.fourcc);
        if pixel_format != PixelFormat::YUYV {
            return Err(V4lError::UnsupportedPixelFormat(pixel_format));
        }
        if actual_format.width != format.width || actual_format.height != format.height {
            log::warn!(
                "Requested size {}x{} not supported, using {}x{}",
                format.width,
                format.height,
                actual_format.width,
                actual_format.height
            );
        }

        // Set the frame rate
        let params = Parameters::with_fps(config.fps);
        device.set_params(&params)?;

        // Create the stream
        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, 4)?;

        Ok(Self {
            stream,
            pixel_format,
            size: ImageSize {
                width: actual_format.width as usize,
                height: actual_format.height as usize,
            },
            device,
        })
    }

    /// Get the negotiated frame size
    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the current pixel format
    #[inline]
    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    /// Grab a frame from the camera.
    ///
    /// Returns `None` when the stream yields no further frames; the caller
    /// should treat this as end of stream and stop capturing.
    pub fn grab(&mut self) -> Option<EncodedFrame<'_>> {
        let Ok((buffer, metadata)) = self.stream.next() else {
            return None;
        };

        Some(EncodedFrame {
            buffer,
            pixel_format: self.pixel_format,
            timestamp: metadata.timestamp,
            sequence: metadata.sequence,
        })
    }
}

/// Decode a YUYV 4:2:2 frame into a preallocated RGB8 image.
///
/// The destination image size defines the expected frame geometry.
pub fn decode_yuyv_rgb8(frame: &EncodedFrame, dst: &mut Image<u8, 3>) -> Result<(), V4lError> {
    if frame.pixel_format != PixelFormat::YUYV {
        return Err(V4lError::UnsupportedPixelFormat(frame.pixel_format));
    }

    let (width, height) = (dst.width(), dst.height());
    let expected = width * height * 2;
    if frame.buffer.len() < expected {
        return Err(V4lError::InvalidBufferSize(
            frame.buffer.len(),
            width,
            height,
        ));
    }

    // YUYV packs two pixels into four bytes sharing one chroma pair
    frame.buffer[..expected]
        .chunks_exact(4)
        .zip(dst.as_slice_mut().chunks_exact_mut(6))
        .for_each(|(yuyv, rgb)| {
            let y0 = yuyv[0] as i32;
            let u = yuyv[1] as i32 - 128;
            let y1 = yuyv[2] as i32;
            let v = yuyv[3] as i32 - 128;

            // BT.601 chroma coefficients scaled by 256
            let r_off = 359 * v;
            let g_off = -88 * u - 183 * v;
            let b_off = 454 * u;

            rgb[0] = (((y0 << 8) + r_off) >> 8).clamp(0, 255) as u8;
            rgb[1] = (((y0 << 8) + g_off) >> 8).clamp(0, 255) as u8;
            rgb[2] = (((y0 << 8) + b_off) >> 8).clamp(0, 255) as u8;
            rgb[3] = (((y1 << 8) + r_off) >> 8).clamp(0, 255) as u8;
            rgb[4] = (((y1 << 8) + g_off) >> 8).clamp(0, 255) as u8;
            rgb[5] = (((y1 << 8) + b_off) >> 8).clamp(0, 255) as u8;
        });

    Ok(())
}
