//! Creation handlers: customers, mechanics and cars.

use std::io::{BufRead, Write};

use super::{returned_id, sql, Session};
use crate::engine::{ShopConnection, SqlValue};
use crate::error::Result;

/// Car fields as entered by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCar {
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i32,
}

impl<C, R, O, E> Session<C, R, O, E>
where
    C: ShopConnection,
    R: BufRead,
    O: Write,
    E: Write,
{
    /// Menu 1: prompt for a customer and insert it, returning the new id
    pub async fn add_customer(&mut self) -> Result<i32> {
        let fname = self.console.prompt("Enter new customer's first name: ")?;
        let lname = self.console.prompt("Enter new customer's last name: ")?;
        let phone = self.console.prompt("Enter new customer's phone number: ")?;
        let address = self.console.prompt("Enter new customer's address: ")?;

        let params: [SqlValue; 4] = [fname.into(), lname.into(), phone.into(), address.into()];
        let created = self.conn.query(sql::INSERT_CUSTOMER, &params).await?;
        let id = returned_id(&created)?;

        self.console.say(format!("Customer added with id: {id}"))?;
        Ok(id)
    }

    /// Menu 2: prompt for a mechanic and insert it, returning the new id
    pub async fn add_mechanic(&mut self) -> Result<i32> {
        let fname = self.console.prompt("Enter new mechanic's first name: ")?;
        let lname = self.console.prompt("Enter new mechanic's last name: ")?;
        let experience = self.console.prompt_int("Enter new mechanic's years of experience: ")?;

        let params: [SqlValue; 3] = [fname.into(), lname.into(), experience.into()];
        let created = self.conn.query(sql::INSERT_MECHANIC, &params).await?;
        let id = returned_id(&created)?;

        self.console.say(format!("Mechanic added with id: {id}"))?;
        Ok(id)
    }

    /// Menu 3: prompt for a car and insert it, returning its VIN
    pub async fn add_car(&mut self) -> Result<String> {
        let car = self.read_car()?;
        self.insert_car(&car).await?;

        self.console.say(format!("Car added with VIN: {}", car.vin))?;
        Ok(car.vin)
    }

    pub(crate) fn read_car(&mut self) -> Result<NewCar> {
        let vin = self.console.prompt("Enter new car's VIN: ")?;
        let make = self.console.prompt("Enter new car's make: ")?;
        let model = self.console.prompt("Enter new car's model: ")?;
        let year = self.console.prompt_int("Enter new car's year: ")?;

        Ok(NewCar { vin, make, model, year })
    }

    pub(crate) async fn insert_car(&mut self, car: &NewCar) -> Result<()> {
        let params: [SqlValue; 4] = [
            car.vin.as_str().into(),
            car.make.as_str().into(),
            car.model.as_str().into(),
            car.year.into(),
        ];
        self.conn.execute(sql::INSERT_CAR, &params).await?;
        Ok(())
    }
}
