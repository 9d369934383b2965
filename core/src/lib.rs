#![crate_type = "lib"]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features
)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]
#![recursion_limit = "60"]

//! This is the core DICOM library, containing various concepts, data structures
//! and traits specific to DICOM content.
//!

pub use chrono;
pub use smallvec;

pub mod dictionary;
pub mod error;
pub mod header;
pub mod ops;
pub mod prelude;
pub mod value;

pub use dictionary::DataDictionary;
pub use error::{Error, Result};
pub use header::{DataElement, DataElementHeader, Length, Tag, VR};
pub use value::{PrimitiveValue, Value as DicomValue};

mod util;

/// Constructs a DICOM primitive value, for complementing an aggregated
/// DICOM data element value (such as a multi-valued string or a list of
/// numbers) or a single value of any other supported type.
///
/// The supported forms are:
///
/// - `dicom_value!(Variant, [elem1, elem2, ...])`, for a multi-valued
///   [`PrimitiveValue`] variant built from an explicit list of elements;
/// - `dicom_value!(Variant, elem)`, for the same variant with a single
///   element;
/// - `dicom_value!(expr)`, converting any value with a
///   [`PrimitiveValue`] conversion (such as a `u16` or a `String`) into a
///   whole [`Value`](crate::value::Value), inferring the nested-item and
///   pixel-data-provider type parameters from the call site.
///
/// ```
/// # use dicom_core::dicom_value;
/// # use dicom_core::PrimitiveValue;
/// let value = dicom_value!(Strs, ["Smith^John"]);
/// assert_eq!(value, PrimitiveValue::Strs(["Smith^John".to_string()][..].into()));
/// ```
#[macro_export]
macro_rules! dicom_value {
    ($typ: ident, [$($elem: expr),* $(,)*]) => {{
        $crate::PrimitiveValue::$typ(
            $crate::smallvec::smallvec![$($elem),*]
        )
    }};
    ($typ: ident, $elem: expr) => {{
        $crate::PrimitiveValue::$typ(
            $crate::smallvec::smallvec![$elem]
        )
    }};
    ($elem: expr) => {
        $crate::DicomValue::from($crate::PrimitiveValue::from($elem))
    };
}
