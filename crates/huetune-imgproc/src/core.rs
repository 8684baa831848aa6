use rayon::prelude::*;

use huetune_image::{Image, ImageError};

/// Perform a bitwise AND operation between two images using a mask.
///
/// The mask is a binary image where the value 0 is considered as False
/// and any other value is considered as True.
///
/// # Arguments
///
/// * `src1` - The first input image.
/// * `src2` - The second input image.
/// * `dst` - The output image.
/// * `mask` - The binary mask to apply to the image.
///
/// # Example
///
/// ```
/// use huetune_image::{Image, ImageSize};
/// use huetune_imgproc::core::bitwise_and;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 2,
///     },
///     vec![0, 1, 2, 253, 254, 255, 128, 129, 130, 64, 65, 66],
/// )
/// .unwrap();
///
/// let mask = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 2,
///     },
///     vec![255, 0, 255, 0],
/// )
/// .unwrap();
///
/// let mut output = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
///
/// bitwise_and(&image, &image, &mut output, &mask).unwrap();
///
/// assert_eq!(
///     output.as_slice(),
///     &[0, 1, 2, 0, 0, 0, 128, 129, 130, 0, 0, 0]
/// );
/// ```
pub fn bitwise_and<const CHANNELS: usize>(
    src1: &Image<u8, CHANNELS>,
    src2: &Image<u8, CHANNELS>,
    dst: &mut Image<u8, CHANNELS>,
    mask: &Image<u8, 1>,
) -> Result<(), ImageError> {
    if src1.size() != src2.size() {
        return Err(ImageError::InvalidImageSize(
            src1.cols(),
            src1.rows(),
            src2.cols(),
            src2.rows(),
        ));
    }

    if src1.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            src1.cols(),
            src1.rows(),
            mask.cols(),
            mask.rows(),
        ));
    }

    if src1.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src1.cols(),
            src1.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let cols = src1.cols();

    // apply the mask to the image, iterating by rows
    dst.as_slice_mut()
        .par_chunks_exact_mut(CHANNELS * cols)
        .zip(src1.as_slice().par_chunks_exact(CHANNELS * cols))
        .zip(src2.as_slice().par_chunks_exact(CHANNELS * cols))
        .zip(mask.as_slice().par_chunks_exact(cols))
        .for_each(|(((dst_row, src1_row), src2_row), mask_row)| {
            dst_row
                .chunks_exact_mut(CHANNELS)
                .zip(src1_row.chunks_exact(CHANNELS))
                .zip(src2_row.chunks_exact(CHANNELS))
                .zip(mask_row.iter())
                .for_each(|(((dst_pixel, src1_pixel), src2_pixel), mask_val)| {
                    for c in 0..CHANNELS {
                        dst_pixel[c] = if *mask_val != 0 {
                            src1_pixel[c] & src2_pixel[c]
                        } else {
                            0
                        };
                    }
                });
        });

    Ok(())
}
