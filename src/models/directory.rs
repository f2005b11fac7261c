//! Team and employee directory models.
//!
//! Teams are *default coverage groups*: a team slot on a day implicitly
//! covers every current member unless a member carries their own slot
//! (an individual override). Membership is the only link — there is no
//! entity hierarchy.

use serde::{Deserialize, Serialize};

/// A default coverage group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Unique team identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Display color inherited by team-derived slots.
    #[serde(default)]
    pub color: String,
    /// Member employee ids, in display order.
    #[serde(default)]
    pub members: Vec<String>,
}

/// A directory entry for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique employee identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Organizational department.
    #[serde(default)]
    pub department: String,
}

impl Team {
    /// Creates a team with no members.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: String::new(),
            members: Vec::new(),
        }
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Adds one member.
    pub fn with_member(mut self, employee_id: impl Into<String>) -> Self {
        self.members.push(employee_id.into());
        self
    }

    /// Replaces the member list.
    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.members = members;
        self
    }

    /// Whether the employee is a current member.
    pub fn has_member(&self, employee_id: &str) -> bool {
        self.members.iter().any(|m| m == employee_id)
    }
}

impl Employee {
    /// Creates an employee.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department: String::new(),
        }
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }
}

/// Looks up a team by id.
pub fn find_team<'a>(teams: &'a [Team], team_id: &str) -> Option<&'a Team> {
    teams.iter().find(|t| t.id == team_id)
}

/// Finds the first team the employee currently belongs to.
pub fn team_of<'a>(teams: &'a [Team], employee_id: &str) -> Option<&'a Team> {
    teams.iter().find(|t| t.has_member(employee_id))
}

/// Looks up an employee by id.
pub fn find_employee<'a>(employees: &'a [Employee], employee_id: &str) -> Option<&'a Employee> {
    employees.iter().find(|e| e.id == employee_id)
}
