//! Raw tag values and typed accessors over them.

pub mod value;
pub mod accessor;
pub mod xmp_lookup;

pub use value::{ExifTags, ExifValue, Rational, XmpBlock, XmpValue};
pub use accessor::{
    Fraction,
    dms_to_decimal,
    exif_dms_to_decimal,
    float_value,
    float_values,
    int_value,
    int_values,
    list_values,
    try_parse_fraction,
};
pub use xmp_lookup::{xmp_f64, xmp_i64, xmp_text, xmp_value};
