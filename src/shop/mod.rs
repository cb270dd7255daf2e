//! Shop Session
//!
//! A `Session` owns the database connection, the operator console and the
//! effective configuration for one run of the program. [`Session::run`] is the
//! menu loop; each menu entry dispatches to one handler method.
//!
//! Handlers are grouped by concern:
//! - [`create`]: customers, mechanics, cars
//! - [`service`]: filing and closing service requests
//! - [`reports`]: the five read-only reports
//!
//! Handler errors are printed to the console's error stream and the loop
//! continues; only console I/O failures end the session early.

use std::io::{BufRead, Write};

use crate::config::ShopConfig;
use crate::console::Console;
use crate::engine::{QueryResult, ShopConnection};
use crate::error::{Result, ShopError};
use crate::menu::{render_menu, MenuChoice};

pub mod create;
pub mod reports;
pub mod service;
pub mod sql;

/// One operator session over a live connection
pub struct Session<C, R, O, E> {
    conn: C,
    console: Console<R, O, E>,
    config: ShopConfig,
}

impl<C, R, O, E> Session<C, R, O, E>
where
    C: ShopConnection,
    R: BufRead,
    O: Write,
    E: Write,
{
    /// Create a session
    pub const fn new(conn: C, console: Console<R, O, E>, config: ShopConfig) -> Self {
        Self { conn, console, config }
    }

    /// The session's configuration
    pub const fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// Direct access to the connection
    pub fn connection(&mut self) -> &mut C {
        &mut self.conn
    }

    /// Split the session back into its connection and console without closing
    pub fn into_parts(self) -> (C, Console<R, O, E>) {
        (self.conn, self.console)
    }

    /// Run the menu loop until the operator exits or input ends, then close
    /// the connection and hand the console back
    pub async fn run(mut self) -> Result<Console<R, O, E>> {
        let outcome = self.menu_loop().await;

        let Self { conn, mut console, .. } = self;
        console.print("Disconnecting from database...")?;
        if let Err(e) = conn.close().await {
            log::debug!("ignoring close failure: {e}");
        }
        console.say("Done\n\nBye !")?;

        outcome.map(|()| console)
    }

    async fn menu_loop(&mut self) -> Result<()> {
        loop {
            self.console.print(render_menu(&self.config.reports))?;

            let number = match self.console.read_choice() {
                Ok(number) => number,
                Err(ShopError::EndOfInput) => return Ok(()),
                Err(e) => return Err(e),
            };

            match MenuChoice::from_number(number) {
                Some(MenuChoice::Exit) => return Ok(()),
                Some(choice) => self.dispatch(choice).await,
                None => self.console.say(format!("Unknown menu choice: {number}"))?,
            }
        }
    }

    /// Run the handler for `choice`, reporting (and absorbing) its error
    pub async fn dispatch(&mut self, choice: MenuChoice) {
        let outcome = match choice {
            MenuChoice::AddCustomer => self.add_customer().await.map(drop),
            MenuChoice::AddMechanic => self.add_mechanic().await.map(drop),
            MenuChoice::AddCar => self.add_car().await.map(drop),
            MenuChoice::InsertServiceRequest => self.insert_service_request().await.map(drop),
            MenuChoice::CloseServiceRequest => self.close_service_request().await.map(drop),
            MenuChoice::ListCustomersWithBillLessThan => {
                self.list_customers_with_bill_less_than().await.map(drop)
            }
            MenuChoice::ListCustomersWithMoreThanNCars => {
                self.list_customers_with_more_than_n_cars().await.map(drop)
            }
            MenuChoice::ListCarsBeforeYearUnderMileage => {
                self.list_cars_before_year_under_mileage().await.map(drop)
            }
            MenuChoice::ListKCarsWithTheMostServices => {
                self.list_k_cars_with_the_most_services().await.map(drop)
            }
            MenuChoice::ListCustomersByTotalBill => {
                self.list_customers_by_total_bill().await.map(drop)
            }
            MenuChoice::Exit => Ok(()),
        };

        if let Err(e) = outcome {
            log::debug!("{choice:?} failed: {} ({})", e.message(), e.error_code());
            self.console.report_error(&e);
        }
    }
}

/// Read the key returned by an `INSERT ... RETURNING` statement
fn returned_id(result: &QueryResult) -> Result<i32> {
    let text = result
        .value(0, 0)
        .ok_or_else(|| ShopError::query_failed("INSERT did not return the new key"))?;

    text.trim()
        .parse()
        .map_err(|_| ShopError::query_failed(format!("INSERT returned a non-integer key '{text}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returned_id() {
        let result = QueryResult {
            columns: vec!["id".to_string()],
            rows: vec![vec![Some("4".to_string())]],
        };
        assert_eq!(returned_id(&result).unwrap(), 4);
    }

    #[test]
    fn test_returned_id_missing() {
        let result = QueryResult { columns: vec!["id".to_string()], rows: Vec::new() };
        assert_eq!(returned_id(&result).unwrap_err().error_code(), "QUERY_FAILED");

        let result =
            QueryResult { columns: vec!["id".to_string()], rows: vec![vec![Some("x".into())]] };
        assert!(returned_id(&result).unwrap_err().message().contains("non-integer"));
    }
}
