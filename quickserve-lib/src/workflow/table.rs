use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{
    models::Customer,
    workflow::{DeleteModal, EditModal},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortColumn {
    Name,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    pub fn toggle(&self, column: SortColumn) -> Self {
        if self.column == column {
            let direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };

            Self { column, direction }
        } else {
            // A different column than the currently sorted one has been selected
            Self {
                column,
                ..Default::default()
            }
        }
    }

    /// Direction of `column`, or `None` if the table is sorted by another column.
    pub fn direction_of(&self, column: SortColumn) -> Option<SortDirection> {
        (self.column == column).then_some(self.direction)
    }

    pub fn compare(&self, a: &Customer, b: &Customer) -> Ordering {
        let key = |c: &Customer| match self.column {
            SortColumn::Name => c.name.to_lowercase(),
            SortColumn::Email => c.email.to_lowercase(),
        };

        let ordering = key(a).cmp(&key(b));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::Name,
            direction: SortDirection::Ascending,
        }
    }
}

/// Customer table with its edit and delete modals.
#[derive(Debug, Clone, Default)]
pub struct CustomerTable {
    pub edit: EditModal,
    pub delete: DeleteModal,
    pub sort: SortState,
}

impl CustomerTable {
    pub fn new(sort: SortState) -> Self {
        Self {
            sort,
            ..Default::default()
        }
    }

    /// Rows in display order.
    pub fn rows(&self, customers: &[Customer]) -> Vec<Customer> {
        let mut rows = customers.to_vec();
        rows.sort_by(|a, b| self.sort.compare(a, b));
        rows
    }

    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort = self.sort.toggle(column);
    }

    /// Open the edit modal on `customer`. Only one modal is open at a time.
    pub fn edit(&mut self, customer: Customer) {
        self.delete.close();
        self.edit.open(customer);
    }

    /// Open the delete confirmation for `customer`. Only one modal is open at a time.
    pub fn confirm_delete(&mut self, customer: Customer) {
        self.edit.close();
        self.delete.open(customer);
    }

    pub fn has_open_modal(&self) -> bool {
        self.edit.is_open() || self.delete.is_open()
    }
}
