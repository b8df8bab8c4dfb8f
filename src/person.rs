use serde::{Deserialize, Serialize};

use crate::core::item::{ItemProcessor, ItemProcessorResult};

/// A person record, read from one input line and written as one output line.
///
/// Fields are bound positionally: first name, then last name. Records carry
/// no identity beyond value equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
}

/// Uppercases both name fields of a person.
///
/// Pure and deterministic; never filters or fails.
#[derive(Default)]
pub struct UpperCaseProcessor;

impl ItemProcessor<Person, Person> for UpperCaseProcessor {
    fn process(&self, item: &Person) -> ItemProcessorResult<Person> {
        Ok(Person {
            first_name: item.first_name.to_uppercase(),
            last_name: item.last_name.to_uppercase(),
        })
    }
}
