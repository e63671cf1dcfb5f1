use crate::Workload;

/// Holds the workloads a run can reference by name.
///
/// Registration order is preserved so enumeration is reproducible.
#[derive(Debug, Default)]
pub struct WorkloadRegistry {
    workloads: Vec<Workload>,
}

impl WorkloadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, workload: Workload) -> Result<(), DuplicateWorkloadError> {
        if self.workloads.iter().any(|w| w.name() == workload.name()) {
            return Err(DuplicateWorkloadError {
                name: workload.name().to_string(),
            });
        }

        self.workloads.push(workload);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Workload, UnknownWorkloadError> {
        self.workloads
            .iter()
            .find(|w| w.name() == name)
            .ok_or_else(|| UnknownWorkloadError {
                name: name.to_string(),
            })
    }

    /// Workload names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.workloads.iter().map(|w| w.name())
    }

    pub fn is_empty(&self) -> bool {
        self.workloads.is_empty()
    }
}

#[derive(derive_more::Error, derive_more::Display, Debug)]
#[display("workload [{name}] is already registered")]
pub struct DuplicateWorkloadError {
    pub name: String,
}

#[derive(derive_more::Error, derive_more::Display, Debug)]
#[display("no workload named [{name}] is registered")]
pub struct UnknownWorkloadError {
    pub name: String,
}
