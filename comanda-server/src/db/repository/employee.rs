//! Employee Repository

use redb::ReadableTable;

use super::{RepoError, RepoResult};
use crate::db::{EMPLOYEES_TABLE, Storage};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate};
use shared::snowflake_id;

#[derive(Clone)]
pub struct EmployeeRepository {
    storage: Storage,
}

impl EmployeeRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Find all employees of a restaurant
    pub fn find_all(&self, restaurant_id: i64) -> RepoResult<Vec<Employee>> {
        let txn = self.storage.begin_read()?;
        let table = txn.open_table(EMPLOYEES_TABLE)?;
        let mut employees = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let employee: Employee = serde_json::from_slice(value.value())?;
            if employee.restaurant_id == restaurant_id {
                employees.push(employee);
            }
        }
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employees)
    }

    /// Find employee by id, scoped to a restaurant
    pub fn find_by_id(&self, restaurant_id: i64, id: i64) -> RepoResult<Option<Employee>> {
        let txn = self.storage.begin_read()?;
        let table = txn.open_table(EMPLOYEES_TABLE)?;
        match table.get(id)? {
            Some(value) => {
                let employee: Employee = serde_json::from_slice(value.value())?;
                Ok((employee.restaurant_id == restaurant_id).then_some(employee))
            }
            None => Ok(None),
        }
    }

    /// Create a new employee under a restaurant
    pub fn create(&self, restaurant_id: i64, data: EmployeeCreate) -> RepoResult<Employee> {
        let employee = Employee {
            id: snowflake_id(),
            restaurant_id,
            user_id: data.user_id,
            name: data.name,
            phone: data.phone,
            address: data.address,
            role: data.role,
        };

        let txn = self.storage.begin_write()?;
        {
            let mut table = txn.open_table(EMPLOYEES_TABLE)?;
            table.insert(employee.id, serde_json::to_vec(&employee)?.as_slice())?;
        }
        txn.commit()?;
        Ok(employee)
    }

    /// Update an employee
    pub fn update(&self, restaurant_id: i64, id: i64, data: EmployeeUpdate) -> RepoResult<Employee> {
        let existing = self
            .find_by_id(restaurant_id, id)?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))?;

        let updated = Employee {
            id: existing.id,
            restaurant_id: existing.restaurant_id,
            user_id: data.user_id.or(existing.user_id),
            name: data.name.unwrap_or(existing.name),
            phone: data.phone.or(existing.phone),
            address: data.address.or(existing.address),
            role: data.role.or(existing.role),
        };

        let txn = self.storage.begin_write()?;
        {
            let mut table = txn.open_table(EMPLOYEES_TABLE)?;
            table.insert(id, serde_json::to_vec(&updated)?.as_slice())?;
        }
        txn.commit()?;
        Ok(updated)
    }

    /// Delete an employee
    pub fn delete(&self, restaurant_id: i64, id: i64) -> RepoResult<bool> {
        self.find_by_id(restaurant_id, id)?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))?;

        let txn = self.storage.begin_write()?;
        {
            let mut table = txn.open_table(EMPLOYEES_TABLE)?;
            table.remove(id)?;
        }
        txn.commit()?;
        Ok(true)
    }
}
