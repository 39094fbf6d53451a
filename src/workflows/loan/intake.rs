use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use super::domain::{ApplicationId, ApplicationState, LoanApplication};

#[derive(Debug, thiserror::Error)]
pub enum ApplicationImportError {
    #[error("failed to read application export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid application CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("duplicate application id {0} in export")]
    DuplicateId(u64),
}

/// Loads CREATED application states from a CSV export, one per row.
pub struct ApplicationImporter;

impl ApplicationImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<ApplicationState>, ApplicationImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ApplicationState>, ApplicationImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut states: Vec<ApplicationState> = Vec::new();
        for record in csv_reader.deserialize::<ApplicationRow>() {
            let row = record?;
            if states
                .iter()
                .any(|state| state.application_id().0 == row.application_id)
            {
                return Err(ApplicationImportError::DuplicateId(row.application_id));
            }
            states.push(row.into_state());
        }

        Ok(states)
    }
}

#[derive(Debug, Deserialize)]
struct ApplicationRow {
    application_id: u64,
    customer_name: String,
    mobile: String,
    pan: String,
    aadhaar: String,
    loan_amount: u64,
    tenure: u32,
    income: u64,
}

impl ApplicationRow {
    fn into_state(self) -> ApplicationState {
        ApplicationState::new(
            ApplicationId(self.application_id),
            LoanApplication {
                customer_name: self.customer_name,
                mobile: self.mobile,
                pan: self.pan,
                aadhaar: self.aadhaar,
                loan_amount: self.loan_amount,
                tenure_months: self.tenure,
                monthly_income: self.income,
            },
        )
    }
}
