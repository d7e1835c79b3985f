//! File-based weighing ticket repository implementation

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use romaneio_domain::model::WeighingTicket;
use romaneio_domain::repository::TicketRepository;
use romaneio_types::{Error, Result};

use super::json_file::{load_records, write_records};

/// File-based implementation of TicketRepository
///
/// Stores tickets keyed by id in `tickets.json`. The settled weights are
/// stored as given; computing them is the caller's job.
pub struct FileTicketRepository {
    store_path: PathBuf,
    tickets: RefCell<HashMap<String, WeighingTicket>>,
}

impl FileTicketRepository {
    /// Create or load a ticket repository
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("tickets.json");
        let tickets = load_records(&store_path)?;

        Ok(Self {
            store_path,
            tickets: RefCell::new(tickets),
        })
    }

    fn persist(&self) -> Result<()> {
        write_records(&self.store_path, &*self.tickets.borrow())
    }

    /// Get total ticket count across tenants
    pub fn count(&self) -> usize {
        self.tickets.borrow().len()
    }
}

impl TicketRepository for FileTicketRepository {
    fn save(&self, ticket: &WeighingTicket) -> std::result::Result<(), Error> {
        self.tickets
            .borrow_mut()
            .insert(ticket.id.clone(), ticket.clone());
        self.persist()
    }

    fn find_by_id(&self, id: &str) -> std::result::Result<Option<WeighingTicket>, Error> {
        Ok(self.tickets.borrow().get(id).cloned())
    }

    fn find_by_number(
        &self,
        tenant: &str,
        farm: &str,
        ticket_number: &str,
    ) -> std::result::Result<Option<WeighingTicket>, Error> {
        Ok(self
            .tickets
            .borrow()
            .values()
            .find(|t| t.tenant == tenant && t.farm == farm && t.ticket_number == ticket_number)
            .cloned())
    }

    fn find_all(&self, tenant: &str) -> std::result::Result<Vec<WeighingTicket>, Error> {
        let mut tickets: Vec<_> = self
            .tickets
            .borrow()
            .values()
            .filter(|t| t.tenant == tenant)
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.ticket_number.cmp(&b.ticket_number)));
        Ok(tickets)
    }

    fn delete(&self, id: &str) -> std::result::Result<bool, Error> {
        let removed = self.tickets.borrow_mut().remove(id).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }
}
