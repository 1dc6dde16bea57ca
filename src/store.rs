use crate::model::StudentRecord;

pub const STORAGE_KEY: &str = "students_v1";

/// Abstract key-value persistence. The store treats durability as
/// best-effort: a backend failure never blocks an in-memory mutation.
pub trait Storage {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

type Listener = Box<dyn FnMut(&[StudentRecord])>;

/// Single source of truth for the record list. Indices are record
/// identity: callers compute them against the latest published snapshot,
/// and the store trusts them (collaborator contract; the IPC layer bounds-
/// checks row positions before they get here).
pub struct StudentStore<S: Storage> {
    storage: S,
    students: Vec<StudentRecord>,
    listeners: Vec<Listener>,
}

impl<S: Storage> StudentStore<S> {
    /// Reads `students_v1` from storage. Absent, unreadable, or unparsable
    /// data all degrade to an empty list; startup never fails on bad data.
    pub fn load(storage: S) -> Self {
        let students = match storage.read(STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_default(),
            _ => Vec::new(),
        };
        Self {
            storage,
            students,
            listeners: Vec::new(),
        }
    }

    pub fn snapshot(&self) -> &[StudentRecord] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Registers a listener and immediately delivers the current snapshot,
    /// so late subscribers never miss the state they joined at.
    pub fn subscribe(&mut self, mut listener: Listener) {
        listener(&self.students);
        self.listeners.push(listener);
    }

    pub fn add(&mut self, record: StudentRecord) {
        self.students.push(record);
        self.save();
    }

    pub fn update(&mut self, index: usize, record: StudentRecord) {
        self.students[index] = record;
        self.save();
    }

    pub fn remove(&mut self, index: usize) {
        self.students.remove(index);
        self.save();
    }

    pub fn clear(&mut self) {
        self.students.clear();
        self.save();
    }

    pub fn replace_all(&mut self, students: Vec<StudentRecord>) {
        self.students = students;
        self.save();
    }

    fn save(&mut self) {
        if let Ok(raw) = serde_json::to_string(&self.students) {
            // Swallowed on purpose: the in-memory list stays authoritative
            // even when the durable write fails (e.g. quota).
            let _ = self.storage.write(STORAGE_KEY, &raw);
        }
        let snapshot = &self.students;
        for listener in &mut self.listeners {
            listener(snapshot);
        }
    }
}

#[cfg(test)]
pub struct MemStorage {
    map: std::collections::HashMap<String, String>,
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemStorage {
    pub fn new() -> Self {
        Self {
            map: std::collections::HashMap::new(),
            fail_writes: false,
        }
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut s = Self::new();
        s.map.insert(key.to_string(), value.to_string());
        s
    }
}

#[cfg(test)]
impl Storage for MemStorage {
    fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.map.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        if self.fail_writes {
            return Err(anyhow::anyhow!("storage quota exceeded"));
        }
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
