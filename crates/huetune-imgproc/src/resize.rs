use fast_image_resize as fr;

use huetune_image::{Image, ImageError};

/// Interpolation modes supported by the resize operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterpolationMode {
    /// Bilinear interpolation.
    Bilinear,
    /// Nearest neighbor interpolation.
    Nearest,
}

/// Resize an RGB8 image to a new size using the `fast_image_resize` crate.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container; its size defines the target size.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use huetune_image::{Image, ImageSize};
/// use huetune_imgproc::resize::{resize_fast, InterpolationMode};
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0u8; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
///
/// let mut image_resized = Image::<u8, 3>::from_size_val(new_size, 0).unwrap();
///
/// resize_fast(&image, &mut image_resized, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(image_resized.num_channels(), 3);
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
///
/// # Errors
///
/// The function returns an error if the image cannot be resized.
pub fn resize_fast(
    src: &Image<u8, 3>,
    dst: &mut Image<u8, 3>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    // prepare the input image for the fast_image_resize crate
    let src_data_len = src.width() * src.height() * 3;
    let src_image = fr::images::ImageRef::new(
        src.width() as u32,
        src.height() as u32,
        src.as_slice(),
        fr::PixelType::U8x3,
    )
    .map_err(|_| ImageError::InvalidChannelShape(src.as_slice().len(), src_data_len))?;

    // prepare the output image for the fast_image_resize crate
    let dst_width = dst.width() as u32;
    let dst_height = dst.height() as u32;
    let dst_data_len = dst.width() * dst.height() * 3;

    let mut dst_image = fr::images::Image::from_slice_u8(
        dst_width,
        dst_height,
        dst.as_slice_mut(),
        fr::PixelType::U8x3,
    )
    .map_err(|_| ImageError::InvalidChannelShape(dst_data_len, dst_data_len))?;

    let options = fr::ResizeOptions::new().resize_alg(match interpolation {
        InterpolationMode::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        InterpolationMode::Nearest => fr::ResizeAlg::Nearest,
    });

    let mut resizer = fr::Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|_| ImageError::IncompatiblePixelTypes)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::InterpolationMode;
    use huetune_image::{Image, ImageError, ImageSize};

    #[test]
    fn resize_fast_constant_image() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            77,
        )?;

        let mut resized = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;

        super::resize_fast(&image, &mut resized, InterpolationMode::Bilinear)?;

        assert_eq!(resized.as_slice(), &[77u8; 2 * 2 * 3]);

        Ok(())
    }

    #[test]
    fn resize_fast_nearest() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 8,
                height: 6,
            },
            120,
        )?;

        let mut resized = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 5,
                height: 4,
            },
            0,
        )?;

        super::resize_fast(&image, &mut resized, InterpolationMode::Nearest)?;

        assert_eq!(resized.as_slice(), &[120u8; 5 * 4 * 3]);

        Ok(())
    }
}
