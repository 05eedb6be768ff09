use super::Operation;

/// Operations belonging to one service, e.g. every sale and purchase of a cruise.
pub struct Service {
    pub id: String,
    operations: Vec<Box<dyn Operation>>,
}

impl Service {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            operations: Vec::new(),
        }
    }

    /// Add an operation to the service.
    pub fn with(mut self, operation: impl Operation + 'static) -> Self {
        self.operations.push(Box::new(operation));
        self
    }

    pub fn operations(&self) -> &[Box<dyn Operation>] {
        &self.operations
    }

    /// Operations of all services in order, ready for the fiscal-year build.
    pub fn flatten(services: impl IntoIterator<Item = Service>) -> Vec<Box<dyn Operation>> {
        services
            .into_iter()
            .flat_map(|service| service.operations)
            .collect()
    }
}
