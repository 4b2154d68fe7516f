pub mod habits;
pub mod health;
pub mod journals;
pub mod moods;
pub mod overview;
pub mod sleeps;
