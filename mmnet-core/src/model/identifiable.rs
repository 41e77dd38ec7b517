/// the three identities carried by every exportable entity.
///
/// - `id`: internal sequence id assigned when the model was loaded
/// - `xml_id`: structured, stable tag
/// - `external_id`: free-form tag from the original data, not guaranteed unique
pub trait Identifiable {
    fn id(&self) -> usize;
    fn xml_id(&self) -> &str;
    fn external_id(&self) -> Option<&str>;
}

/// implements [Identifiable] for a struct with `id`, `xml_id` and `external_id` fields
/// where `id` is a typed id newtype.
macro_rules! impl_identifiable {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl $crate::model::Identifiable for $entity {
                fn id(&self) -> usize {
                    self.id.0
                }

                fn xml_id(&self) -> &str {
                    &self.xml_id
                }

                fn external_id(&self) -> Option<&str> {
                    self.external_id.as_deref()
                }
            }
        )+
    };
}

pub(crate) use impl_identifiable;
