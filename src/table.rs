use crate::model::StudentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub page_index: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    EditRequested(StudentRecord, usize),
    DeleteRequested(usize),
}

/// Read-only paged projection of the store list. Page index and size are
/// view state only; the table never mutates the store, it just translates
/// row positions into global indices and emits intents.
#[derive(Debug, Default)]
pub struct StudentTable {
    students: Vec<StudentRecord>,
    pager: Option<PageState>,
}

impl StudentTable {
    /// Replaces the snapshot. A changed dataset invalidates the previous
    /// page position, so the view snaps back to the first page (this also
    /// happens on in-place edits, intentionally).
    pub fn set_students(&mut self, students: Vec<StudentRecord>) {
        self.students = students;
        if let Some(pager) = self.pager.as_mut() {
            pager.page_index = 0;
        }
    }

    pub fn set_page(&mut self, page_index: usize, page_size: usize) {
        self.pager = Some(PageState {
            page_index,
            page_size,
        });
    }

    pub fn pager(&self) -> Option<PageState> {
        self.pager
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Without an active pager the local position already is the global
    /// index.
    pub fn global_index(&self, local: usize) -> usize {
        match self.pager {
            // Saturating: an absurd page just lands past the end and the
            // bounds check turns it into "no intent".
            Some(pager) => pager
                .page_index
                .saturating_mul(pager.page_size)
                .saturating_add(local),
            None => local,
        }
    }

    pub fn page_rows(&self) -> &[StudentRecord] {
        match self.pager {
            Some(pager) => {
                let start = pager
                    .page_index
                    .saturating_mul(pager.page_size)
                    .min(self.students.len());
                let end = start
                    .saturating_add(pager.page_size)
                    .min(self.students.len());
                &self.students[start..end]
            }
            None => &self.students,
        }
    }

    pub fn request_edit(&self, local: usize) -> Option<TableEvent> {
        let index = self.global_index(local);
        let record = self.students.get(index)?.clone();
        Some(TableEvent::EditRequested(record, index))
    }

    pub fn request_delete(&self, local: usize) -> Option<TableEvent> {
        let index = self.global_index(local);
        if index >= self.students.len() {
            return None;
        }
        Some(TableEvent::DeleteRequested(index))
    }
}
