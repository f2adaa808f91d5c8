//! regex_replacer native extension.
//!
//! Exposes `RegexReplacer` to Python. Batches run with the GIL released, so the
//! rayon workers never contend with the interpreter. The class follows the
//! scikit-learn transformer protocol and can sit inside a `Pipeline`.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use regex_replacer_core::RegexReplacer;

fn to_value_error(e: anyhow::Error) -> PyErr {
    PyValueError::new_err(format!("{:#}", e))
}

/// Applies `(pattern, replacement)` pairs in order to every text of a batch.
///
/// Each pair replaces all matches in the output of the previous pair.
/// `n_jobs > 1` gives this instance its own pool of `n_jobs` threads; `0` or `1`
/// uses the shared pool sized to the CPU count.
#[pyclass(name = "RegexReplacer", module = "regex_replacer.regex_replacer")]
pub struct PyRegexReplacer {
    inner: RegexReplacer,
    /// The list passed to the constructor, returned as-is by `get_params`.
    re_list: Py<PyAny>,
    n_rules: usize,
}

#[pymethods]
impl PyRegexReplacer {
    #[new]
    #[pyo3(signature = (re_list, n_jobs = 0))]
    fn new(re_list: &Bound<'_, PyAny>, n_jobs: usize) -> PyResult<Self> {
        let pairs: Vec<(String, String)> = re_list.extract()?;
        let inner = RegexReplacer::from_pairs(pairs.iter().map(|(p, r)| (p.as_str(), r.as_str())), n_jobs)
            .map_err(to_value_error)?;
        log::debug!("Created RegexReplacer with {} rule(s).", pairs.len());
        Ok(Self {
            inner,
            re_list: re_list.clone().unbind(),
            n_rules: pairs.len(),
        })
    }

    /// Rewrites `texts`; the result keeps the input order.
    #[pyo3(signature = (texts, single_thread = false))]
    fn transform(&self, py: Python<'_>, texts: Vec<String>, single_thread: bool) -> Vec<String> {
        py.allow_threads(|| self.inner.transform(texts, single_thread))
    }

    /// No-op; present for the scikit-learn transformer protocol.
    #[pyo3(signature = (x, y = None))]
    #[allow(unused_variables)]
    fn fit<'py>(
        slf: PyRef<'py, Self>,
        x: &Bound<'py, PyAny>,
        y: Option<&Bound<'py, PyAny>>,
    ) -> PyRef<'py, Self> {
        slf
    }

    #[pyo3(signature = (x, y = None, single_thread = false))]
    #[allow(unused_variables)]
    fn fit_transform(
        &self,
        py: Python<'_>,
        x: Vec<String>,
        y: Option<&Bound<'_, PyAny>>,
        single_thread: bool,
    ) -> Vec<String> {
        self.transform(py, x, single_thread)
    }

    /// Constructor arguments, as scikit-learn's `clone` expects. `re_list` is
    /// the very object the instance was built with.
    #[pyo3(signature = (deep = true))]
    #[allow(unused_variables)]
    fn get_params<'py>(&self, py: Python<'py>, deep: bool) -> PyResult<Bound<'py, PyDict>> {
        let params = PyDict::new_bound(py);
        params.set_item("re_list", self.re_list.bind(py))?;
        params.set_item("n_jobs", self.inner.n_jobs())?;
        Ok(params)
    }

    #[getter]
    fn n_jobs(&self) -> usize {
        self.inner.n_jobs()
    }

    fn __len__(&self) -> usize {
        self.n_rules
    }

    fn __repr__(&self) -> String {
        format!("RegexReplacer(rules={}, n_jobs={})", self.n_rules, self.inner.n_jobs())
    }
}

/// regex_replacer native extension module
#[pymodule]
#[pyo3(name = "regex_replacer")]
fn regex_replacer_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyRegexReplacer>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
