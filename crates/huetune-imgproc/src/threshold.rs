use crate::parallel;
use huetune_image::{Image, ImageError};

/// Apply a range threshold to an image.
///
/// A pixel is selected iff each of its channel values lies within the
/// corresponding closed interval `[lower_bound[i], upper_bound[i]]` for all
/// channels simultaneously. An inverted bound (`lower_bound[i] >
/// upper_bound[i]`) is legal and selects nothing for that channel's test.
///
/// # Arguments
///
/// * `src` - The input image of an arbitrary number of channels and type.
/// * `dst` - The output mask with a single channel as byte values (0 or 255).
/// * `lower_bound` - The lower bound for each channel.
/// * `upper_bound` - The upper bound for each channel.
///
/// Precondition: the input and output images must have the same size.
///
/// # Examples
///
/// ```
/// use huetune_image::{Image, ImageSize};
/// use huetune_imgproc::threshold::in_range;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     data,
/// )
/// .unwrap();
///
/// let mut thresholded = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// in_range(&image, &mut thresholded, &[100, 150, 0], &[200, 200, 200]).unwrap();
///
/// assert_eq!(thresholded.num_channels(), 1);
/// assert_eq!(thresholded.get_pixel(0, 0, 0).unwrap(), &255);
/// assert_eq!(thresholded.get_pixel(1, 0, 0).unwrap(), &0);
/// ```
pub fn in_range<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<u8, 1>,
    lower_bound: &[T; C],
    upper_bound: &[T; C],
) -> Result<(), ImageError>
where
    T: Clone + Send + Sync + PartialOrd,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // parallelize the operation by rows
    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let mut is_in_range = true;
        src_pixel
            .iter()
            .zip(lower_bound.iter().zip(upper_bound.iter()))
            .for_each(|(src_val, (lower, upper))| {
                is_in_range &= src_val >= lower && src_val <= upper;
            });
        dst_pixel[0] = if is_in_range { 255 } else { 0 };
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use huetune_image::{Image, ImageError, ImageSize};

    #[test]
    fn in_range() -> Result<(), ImageError> {
        let data = vec![100u8, 200, 50, 150, 200, 250];
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            data,
        )?;

        let mut thresholded = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        super::in_range(&image, &mut thresholded, &[100, 150, 0], &[200, 200, 200])?;
        assert_eq!(thresholded.num_channels(), 1);
        assert_eq!(thresholded.size().width, 2);
        assert_eq!(thresholded.size().height, 1);

        assert_eq!(thresholded.as_slice(), &[255, 0]);

        Ok(())
    }

    #[test]
    fn in_range_bounds_are_closed() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 4,
                height: 1,
            },
            vec![99, 100, 130, 131],
        )?;

        let mut thresholded = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::in_range(&image, &mut thresholded, &[100], &[130])?;

        assert_eq!(thresholded.as_slice(), &[0, 255, 255, 0]);

        Ok(())
    }

    #[test]
    fn in_range_inverted_bound_selects_nothing() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            115,
        )?;

        let mut thresholded = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        // the first channel interval is inverted, so no pixel can satisfy it
        super::in_range(&image, &mut thresholded, &[130, 100, 100], &[100, 255, 255])?;

        assert_eq!(thresholded.as_slice(), &[0u8; 6]);

        Ok(())
    }

    #[test]
    fn in_range_is_idempotent() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![115, 200, 200, 90, 200, 200],
        )?;

        let mut first = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        let mut second = Image::<u8, 1>::from_size_val(image.size(), 0)?;

        super::in_range(&image, &mut first, &[100, 100, 100], &[130, 255, 255])?;
        super::in_range(&image, &mut second, &[100, 100, 100], &[130, 255, 255])?;

        assert_eq!(first.as_slice(), second.as_slice());

        Ok(())
    }
}
