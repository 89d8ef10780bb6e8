/// Declare a model type and register its fields.
///
/// Expands to a unit struct implementing [`Model`](crate::model::Model) whose metadata
/// is built on first use and kept for the life of the process. The table is the
/// lowercased type name unless given with `as "table"`.
///
/// ```rust
/// use lazy_orm::prelude::*;
///
/// lazy_orm::model! {
///     /// Exam results.
///     pub struct Student {
///         name: Field::text(),
///         score: Field::integer(),
///         subject: Field::text(),
///     }
/// }
///
/// assert_eq!(Student::table_name(), "student");
/// assert_eq!(
///     Student::meta().field_names().collect::<Vec<_>>(),
///     ["name", "score", "subject"]
/// );
/// ```
#[macro_export]
macro_rules! model {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident $(as $table:literal)? {
            $($field:ident : $descriptor:expr),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        $vis struct $name;

        impl $crate::model::Model for $name {
            fn meta() -> &'static $crate::model::ModelMeta {
                static META: ::std::sync::LazyLock<$crate::model::ModelMeta> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::model::ModelMeta::builder(stringify!($name))
                            $(.table($table))?
                            $(.field(stringify!($field), $descriptor))*
                            .build()
                    });
                &META
            }
        }
    };
}
