//! Sensor-frame pixel coordinates carried alongside image data.
//!
//! Row `t` of `x` holds the sensor column index of every column of tap `t`
//! (a whole-sensor image has a single row). `y` works the same way for rows.
//! Coordinates go through exactly the same slicing, reversal and stacking as
//! the pixel data, so they always name true sensor positions.

use ndarray::{Array1, Array2, ArrayView1, Axis, Slice, concatenate, stack};

use crate::ccd::common::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelCoords {
    pub x: Array2<usize>,
    pub y: Array2<usize>,
}

/// Split one coordinate row into its near (`left`) and mirrored far (`right`) halves.
fn split_row(row: ArrayView1<'_, usize>, num_new: usize) -> Result<Array2<usize>> {
    let num = row.len();
    let left = row.slice_axis(Axis(0), Slice::from(..num_new));
    let right = row.slice_axis(Axis(0), Slice::new((num - num_new) as isize, None, -1));
    Ok(stack(Axis(0), &[left, right])?)
}

/// Undo [`split_row`], returning a single row in sensor order.
fn join_rows(rows: &Array2<usize>) -> Result<Array2<usize>> {
    let left = rows.row(0);
    let mut right = rows.row(1);
    right.invert_axis(Axis(0));
    let joined = concatenate(Axis(0), &[left, right])?;
    Ok(joined.insert_axis(Axis(0)))
}

impl PixelCoords {
    /// Coordinates of an uncropped whole-sensor image.
    pub fn sensor(num_x: usize, num_y: usize) -> Self {
        Self {
            x: Array1::from_iter(0..num_x).insert_axis(Axis(0)),
            y: Array1::from_iter(0..num_y).insert_axis(Axis(0)),
        }
    }

    pub(crate) fn split(&self, num_x_new: usize, num_y_new: usize) -> Result<Self> {
        Ok(Self {
            x: split_row(self.x.row(0), num_x_new)?,
            y: split_row(self.y.row(0), num_y_new)?,
        })
    }

    pub(crate) fn join(&self) -> Result<Self> {
        Ok(Self {
            x: join_rows(&self.x)?,
            y: join_rows(&self.y)?,
        })
    }

    pub(crate) fn slice_x(&self, slice: Slice) -> Self {
        Self {
            x: self.x.slice_axis(Axis(1), slice).to_owned(),
            y: self.y.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_split_mirrors_far_half() {
        let coords = PixelCoords::sensor(6, 4).split(3, 2).unwrap();
        assert_eq!(coords.x, array![[0, 1, 2], [5, 4, 3]]);
        assert_eq!(coords.y, array![[0, 1], [3, 2]]);
    }

    #[test]
    fn test_split_drops_middle_remainder() {
        let coords = PixelCoords::sensor(7, 2).split(3, 1).unwrap();
        assert_eq!(coords.x, array![[0, 1, 2], [6, 5, 4]]);
    }

    #[test]
    fn test_join_inverts_split() {
        let coords = PixelCoords::sensor(6, 4);
        assert_eq!(coords.split(3, 2).unwrap().join().unwrap(), coords);
    }
}
