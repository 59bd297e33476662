// One accepted, normalized arrival prediction.
// Built once per poll cycle and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalRecord {
    service_id: String,
    destination_name: String,
    aimed_time: String,
    expected_time: String,
    delay: String,
}

impl ArrivalRecord {
    pub fn new(
        service_id: impl Into<String>,
        destination_name: impl Into<String>,
        aimed_time: impl Into<String>,
        expected_time: impl Into<String>,
        delay: impl Into<String>,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            destination_name: destination_name.into(),
            aimed_time: aimed_time.into(),
            expected_time: expected_time.into(),
            delay: delay.into(),
        }
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn destination_name(&self) -> &str {
        &self.destination_name
    }

    /// Scheduled time, "hh:mm" or empty when the source timestamp was unusable
    pub fn aimed_time(&self) -> &str {
        &self.aimed_time
    }

    /// Predicted time, "hh:mm" or empty when the source timestamp was unusable
    pub fn expected_time(&self) -> &str {
        &self.expected_time
    }

    pub fn delay(&self) -> &str {
        &self.delay
    }

    // Format as "08:02 [PT2M]"
    pub fn expected_with_delay(&self) -> String {
        format!("{} [{}]", self.expected_time, self.delay)
    }

    // Format as "1 Island Bay due 08:00 exp 08:02 [PT2M]"
    pub fn format(&self) -> String {
        format!(
            "{} {} due {} exp {}",
            self.service_id,
            self.destination_name,
            self.aimed_time,
            self.expected_with_delay()
        )
    }
}

/// Bounded, ordered set of the arrivals currently on screen.
///
/// Records keep the order they were appended in. Once `capacity` records are
/// held every further append is refused and the record is dropped.
#[derive(Debug, Clone)]
pub struct ArrivalStore {
    records: Vec<ArrivalRecord>,
    capacity: usize,
}

impl ArrivalStore {
    pub const DEFAULT_CAPACITY: usize = 4;

    pub fn new(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Append `record` unless the store is full.
    ///
    /// Returns `false` (and discards the record) when already at capacity.
    pub fn try_append(&mut self, record: ArrivalRecord) -> bool {
        if self.is_full() {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&ArrivalRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArrivalRecord> {
        self.records.iter()
    }
}

impl Default for ArrivalStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
