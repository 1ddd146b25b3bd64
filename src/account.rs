use crate::api::model::Balances;
use crate::api::{NamecheapClient, Params, Response};
use crate::error::Result;

const GET_BALANCES: &str = "namecheap.users.getBalances";

/// Account-level information.
#[derive(Debug, Clone)]
pub struct Account {
    client: NamecheapClient,
}

impl Account {
    pub fn new(client: NamecheapClient) -> Self {
        Self { client }
    }

    /// Gets the account's available funds.
    pub fn balances(&self) -> Result<Response<Balances>> {
        let response = self.client.request(GET_BALANCES, &Params::new())?;
        response.try_map(|command| Ok(Balances::from_element(command.require_child("UserGetBalancesResult")?)))
    }
}
