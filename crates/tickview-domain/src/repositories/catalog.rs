use crate::error::ChartDataError;
use crate::value_objects::catalog::Catalog;

pub trait CatalogRepository {
    fn load_catalog(&self) -> Result<Catalog, ChartDataError>;
}
