pub mod case;
pub mod names;

pub use case::{split_words, to_camel_case, to_constant_case, to_pascal_case, to_snake_case};
pub use names::{
    NameRegistry, case_prefix_for_page, class_name_for_page, derive_name, file_stem_for_page,
    page_name_from_url,
};
