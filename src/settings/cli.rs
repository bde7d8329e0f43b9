use super::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "library-catalog", about = "Browse and manage the library catalog")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,
    /// Signs in before running the command.
    #[arg(long, env = "LIBRARY_EMAIL")]
    pub email: Option<String>,
    #[arg(long, env = "LIBRARY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List books, filtered, sorted and paged locally.
    Books {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value = "title")]
        sort: String,
        #[arg(long)]
        desc: bool,
        #[arg(long)]
        page: Option<usize>,
        #[arg(long, default_value_t = 12)]
        per_page: usize,
    },
    Book {
        id: String,
    },
    /// Dashboard counters.
    Stats,
    Categories {
        #[arg(long)]
        search: Option<String>,
    },
    CreateCategory {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    DeleteCategory {
        id: String,
    },
    Borrows,
    Borrow {
        #[arg(long)]
        book_id: String,
        #[arg(long)]
        user_id: String,
    },
    Return {
        borrow_id: String,
    },
    Whoami,
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone_number: String,
    },
    ConfirmSignUp {
        #[arg(long)]
        username: String,
        #[arg(long)]
        code: String,
    },
    ForgotPassword {
        #[arg(long)]
        username: String,
    },
    ConfirmForgotPassword {
        #[arg(long)]
        username: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        new_password: String,
    },
}
