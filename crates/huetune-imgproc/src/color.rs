use crate::parallel;
use huetune_image::{Image, ImageError};

/// Convert an RGB image to an HSV image.
///
/// The input image is assumed to have 3 channels in the order R, G, B.
///
/// # Arguments
///
/// * `src` - The input RGB image assumed to have 3 channels.
/// * `dst` - The output HSV image.
///
/// # Returns
///
/// The HSV image with the following channels:
///
/// * H: The hue channel in the range [0, 180] (0-360 degrees).
/// * S: The saturation channel in the range [0, 255].
/// * V: The value channel in the range [0, 255].
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use huetune_image::{Image, ImageSize};
/// use huetune_imgproc::color::hsv_from_rgb;
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
/// let mut hsv = Image::<u8, 3>::from_size_val(image.size(), 0).unwrap();
///
/// hsv_from_rgb(&image, &mut hsv).unwrap();
///
/// assert_eq!(hsv.num_channels(), 3);
/// assert_eq!(hsv.size().width, 4);
/// assert_eq!(hsv.size().height, 5);
/// ```
pub fn hsv_from_rgb(src: &Image<u8, 3>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        // Normalize the input to the range [0, 1]
        let r = src_pixel[0] as f32 / 255.;
        let g = src_pixel[1] as f32 / 255.;
        let b = src_pixel[2] as f32 / 255.;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (((g - b) / delta) % 6.0)
        } else if max == g {
            60.0 * (((b - r) / delta) + 2.0)
        } else {
            60.0 * (((r - g) / delta) + 4.0)
        };

        // Ensure h is in the range [0, 360)
        let h = if h < 0.0 { h + 360.0 } else { h };

        let s = if max == 0.0 { 0.0 } else { delta / max };

        // scale h to [0, 180], s and v to [0, 255]
        dst_pixel[0] = (h * 0.5).round() as u8;
        dst_pixel[1] = (s * 255.0).round() as u8;
        dst_pixel[2] = (max * 255.0).round() as u8;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use huetune_image::{Image, ImageError, ImageSize};

    #[test]
    fn hsv_from_rgb() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![
                255, 0, 0, // red
                0, 255, 0, // green
                0, 0, 255, // blue
                128, 128, 128, // gray
                255, 255, 255, // white
                43, 85, 200, // muted blue
            ],
        )?;

        let expected = [
            0, 255, 255, //
            60, 255, 255, //
            120, 255, 255, //
            0, 0, 128, //
            0, 0, 255, //
            112, 200, 200, //
        ];

        let mut hsv = Image::<u8, 3>::from_size_val(image.size(), 0)?;

        super::hsv_from_rgb(&image, &mut hsv)?;

        assert_eq!(hsv.as_slice(), &expected);

        Ok(())
    }

    #[test]
    fn hsv_from_rgb_wraps_negative_hue() -> Result<(), ImageError> {
        // magenta-ish pixel whose raw hue angle is negative before wrapping
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 1,
                height: 1,
            },
            vec![255, 0, 128],
        )?;

        let mut hsv = Image::<u8, 3>::from_size_val(image.size(), 0)?;
        super::hsv_from_rgb(&image, &mut hsv)?;

        assert_eq!(hsv.as_slice(), &[165, 255, 255]);

        Ok(())
    }

    #[test]
    fn hsv_from_rgb_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;
        let mut hsv = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0,
        )?;

        assert!(super::hsv_from_rgb(&image, &mut hsv).is_err());

        Ok(())
    }
}
