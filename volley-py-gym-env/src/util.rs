//! Conversion utilities between Python and Rust objects.
use ndarray::ArrayD;
use num_traits::cast::AsPrimitive;
use numpy::{Element, PyArrayDyn};
use pyo3::PyObject;

/// Converts a numpy array in a [`PyObject`] into an [`ArrayD`].
///
/// `T1` is the dtype of the numpy array, `T2` the element type of the
/// resulting array.
pub fn pyobj_to_arrayd<T1, T2>(obs: PyObject) -> ArrayD<T2>
where
    T1: Element + AsPrimitive<T2>,
    T2: 'static + Copy,
{
    pyo3::Python::with_gil(|py| {
        let arr: &PyArrayDyn<T1> = obs.extract(py).unwrap();
        arr.readonly().as_array().map(|&e| e.as_())
    })
}
