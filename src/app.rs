use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;

use crate::form::{DraftMode, FieldErrors, FormEvent, StudentForm};
use crate::model::StudentRecord;
use crate::store::{Storage, StudentStore};
use crate::table::{StudentTable, TableEvent};

/// Wires Form, Table and Store together: the table subscribes to store
/// publications, form submissions land in the store, and table intents
/// either load the form draft or delete through the store. Single-threaded
/// by design; the shared table handle is plain `Rc<RefCell<..>>`.
pub struct App<S: Storage> {
    pub store: StudentStore<S>,
    pub form: StudentForm,
    pub table: Rc<RefCell<StudentTable>>,
}

impl<S: Storage> App<S> {
    pub fn new(storage: S) -> Self {
        let mut store = StudentStore::load(storage);
        let table = Rc::new(RefCell::new(StudentTable::default()));
        let sink = Rc::clone(&table);
        store.subscribe(Box::new(move |snapshot| {
            sink.borrow_mut().set_students(snapshot.to_vec());
        }));
        Self {
            store,
            form: StudentForm::default(),
            table,
        }
    }

    /// One valid submit becomes exactly one store mutation: append for a
    /// create draft, replace-in-place for an edit draft.
    pub fn submit_form(&mut self, today: NaiveDate) -> Result<FormEvent, FieldErrors> {
        let event = self.form.submit(today)?;
        match &event {
            FormEvent::RecordAdded(record) => self.store.add(record.clone()),
            FormEvent::RecordUpdated(record, index) => self.store.update(*index, record.clone()),
        }
        Ok(event)
    }

    pub fn request_edit(&mut self, row: usize) -> Option<(StudentRecord, usize)> {
        let event = self.table.borrow().request_edit(row)?;
        let TableEvent::EditRequested(record, index) = event else {
            return None;
        };
        self.form.load_draft(Some((&record, index)));
        Some((record, index))
    }

    pub fn request_delete(&mut self, row: usize) -> Option<usize> {
        let event = self.table.borrow().request_delete(row)?;
        let TableEvent::DeleteRequested(index) = event else {
            return None;
        };
        // Keep the draft's edit target valid across the shift.
        self.form.record_removed(index);
        self.store.remove(index);
        Some(index)
    }

    pub fn clear(&mut self) {
        if matches!(self.form.mode(), DraftMode::EditAt(_)) {
            self.form.load_draft(None);
        }
        self.store.clear();
    }
}
