mod shell;
pub use shell::Shell;

mod login;
pub use login::Login;

mod signup;
pub use signup::Signup;

mod dashboard;
pub use dashboard::Dashboard;

mod tasks;
pub use tasks::Tasks;

mod notes;
pub use notes::Notes;

mod profile;
pub use profile::Profile;
