//! Per-frame metadata values that broadcast over the batch axes of an image.

use ndarray::{ArrayD, IxDyn};

use crate::ccd::common::error::{CcdError, Result};

/// A metadata value shared by every frame or varying along the batch axes.
///
/// `PerFrame` arrays follow numpy broadcasting: shapes align from the right
/// and axes of length one stretch to the batch extent.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Uniform(T),
    PerFrame(ArrayD<T>),
}

impl<T: Clone> Field<T> {
    /// Build a field from one value per batch element in row-major order.
    ///
    /// An empty batch shape describes a single image and yields `Uniform`.
    pub fn from_values(batch_shape: &[usize], mut values: Vec<T>) -> Result<Self> {
        if batch_shape.is_empty() {
            if values.len() != 1 {
                return Err(CcdError::Shape(format!(
                    "expected 1 value for a single frame, got {}",
                    values.len()
                )));
            }
            return Ok(Field::Uniform(values.remove(0)));
        }
        let array = ArrayD::from_shape_vec(IxDyn(batch_shape), values)?;
        Ok(Field::PerFrame(array))
    }

    /// Check that this field broadcasts over `batch_shape`.
    pub fn check_broadcast(&self, batch_shape: &[usize]) -> Result<()> {
        match self {
            Field::Uniform(_) => Ok(()),
            Field::PerFrame(array) => {
                if array.broadcast(IxDyn(batch_shape)).is_some() {
                    Ok(())
                } else {
                    Err(CcdError::Shape(format!(
                        "metadata shape {:?} does not broadcast over batch shape {:?}",
                        array.shape(),
                        batch_shape
                    )))
                }
            }
        }
    }

    /// The value for the batch element at `index`.
    ///
    /// `index` must cover every axis of a `PerFrame` array, aligned from the right.
    pub fn get(&self, index: &[usize]) -> Result<&T> {
        match self {
            Field::Uniform(value) => Ok(value),
            Field::PerFrame(array) => {
                let offset = index.len().checked_sub(array.ndim()).ok_or_else(|| {
                    CcdError::Shape(format!(
                        "index {index:?} is shorter than metadata shape {:?}",
                        array.shape()
                    ))
                })?;
                let local: Vec<usize> = array
                    .shape()
                    .iter()
                    .zip(&index[offset..])
                    .map(|(&len, &i)| if len == 1 { 0 } else { i })
                    .collect();
                array.get(IxDyn(&local)).ok_or_else(|| {
                    CcdError::Shape(format!(
                        "index {index:?} out of bounds for metadata shape {:?}",
                        array.shape()
                    ))
                })
            }
        }
    }

    /// Collapse a `PerFrame` field to `Uniform` when every element is equal.
    pub fn collapse(self) -> Self
    where
        T: PartialEq,
    {
        match self {
            Field::PerFrame(array) => {
                let first = array.iter().next().cloned();
                match first {
                    Some(first) if array.iter().all(|v| *v == first) => Field::Uniform(first),
                    _ => Field::PerFrame(array),
                }
            }
            uniform => uniform,
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Uniform(value)
    }
}
