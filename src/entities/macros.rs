//! Macros for reducing boilerplate when declaring searchable models

/// Implement [`Model`](crate::core::model::Model) for a serde struct
///
/// The struct must implement `Default`, `Serialize` and `Deserialize`.
/// Hydration deserializes `_source` straight into the struct; `key` names the
/// primary key field. An optional `index` overrides the configured index.
///
/// # Example
///
/// ```rust,ignore
/// use elastic_model::prelude::*;
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// pub struct Article {
///     pub id: u64,
///     pub title: String,
///     pub views: u64,
/// }
///
/// impl_search_model!(Article, "articles", key = id);
///
/// // Or, stored in a dedicated index:
/// // impl_search_model!(Article, "articles", key = id, index = "blog");
/// ```
#[macro_export]
macro_rules! impl_search_model {
    ($type:ty, $table:expr, key = $key:ident $(, index = $index:expr)? $(,)?) => {
        impl $crate::core::model::Model for $type {
            fn table() -> &'static str {
                $table
            }

            $(
                fn index_name() -> Option<&'static str> {
                    Some($index)
                }
            )?

            fn key(&self) -> Option<$crate::prelude::Value> {
                $crate::core::model::key_value(&self.$key)
            }

            fn new_instance(attributes: $crate::core::model::Attributes, _exists: bool) -> Self {
                $crate::core::model::attributes_into(attributes).unwrap_or_default()
            }

            fn set_raw_attributes(
                &mut self,
                attributes: $crate::core::model::Attributes,
                _sync: bool,
            ) -> $crate::core::model::AttributeResult {
                *self = $crate::core::model::attributes_into(attributes)?;
                Ok(())
            }
        }
    };
}
