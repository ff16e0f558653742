use super::ByteSource;
use crate::error::Result;

/// Archive bytes already held in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

impl ByteSource for MemorySource {
    fn load(&self) -> Result<Vec<u8>> {
        Ok(self.data.clone())
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
