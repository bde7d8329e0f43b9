use library_catalog::application_port::*;
use library_catalog::catalog::*;
use library_catalog::domain_model::{CreateBorrow, CreateCategory};
use library_catalog::library::Library;
use library_catalog::logger::*;
use library_catalog::settings::*;
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let library = Library::try_new(&project_settings)?;

    if let (Some(email), Some(password)) = (cli.email.clone(), cli.password.clone()) {
        library
            .identity
            .sign_in(SignInInput { email, password })
            .await?;
        info!("signed in");
    }

    run(&library, cli.command).await
}

async fn run(library: &Library, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Books {
            search,
            category,
            sort,
            desc,
            page,
            per_page,
        } => {
            let query = BookQuery {
                search,
                category,
                sort_by: sort.parse().map_err(|e: String| anyhow::anyhow!(e))?,
                order: if desc {
                    SortOrder::Descending
                } else {
                    SortOrder::Ascending
                },
                page: page.map(|index| PageRequest {
                    index,
                    size: per_page,
                }),
            };
            let books = library.books.get_all_books().await?;
            print_json(&query.apply(&books))
        }
        Command::Book { id } => print_json(&library.books.get_book(&id).await?),
        Command::Stats => {
            let (books, categories) = tokio::try_join!(
                library.books.get_all_books(),
                library.categories.get_all_categories()
            )?;
            print_json(&CatalogStats::compute(&books, &categories))
        }
        Command::Categories { search } => {
            let categories = match search {
                Some(term) => library.categories.search_categories(&term).await?,
                None => library.categories.get_all_categories().await?,
            };
            print_json(&categories)
        }
        Command::CreateCategory { name, description } => print_json(
            &library
                .categories
                .create_category(CreateCategory { name, description })
                .await?,
        ),
        Command::DeleteCategory { id } => {
            library.categories.delete_category(&id).await?;
            info!(%id, "category deleted");
            Ok(())
        }
        Command::Borrows => print_json(&library.borrows.get_all_borrows().await?),
        Command::Borrow { book_id, user_id } => print_json(
            &library
                .borrows
                .borrow_book(CreateBorrow { book_id, user_id })
                .await?,
        ),
        Command::Return { borrow_id } => {
            print_json(&library.borrows.return_book(&borrow_id).await?)
        }
        Command::Whoami => print_json(&library.identity.current_user().await?),
        Command::SignUp {
            email,
            password,
            name,
            phone_number,
        } => {
            let result = library
                .identity
                .sign_up(SignUpInput {
                    email,
                    password,
                    name,
                    phone_number,
                })
                .await?;
            info!(user_sub = %result.user_sub, confirmed = result.user_confirmed, "signed up");
            Ok(())
        }
        Command::ConfirmSignUp { username, code } => {
            library.identity.confirm_sign_up(&username, &code).await?;
            info!(%username, "account confirmed");
            Ok(())
        }
        Command::ForgotPassword { username } => {
            library.identity.forgot_password(&username).await?;
            info!(%username, "password reset code sent");
            Ok(())
        }
        Command::ConfirmForgotPassword {
            username,
            code,
            new_password,
        } => {
            library
                .identity
                .confirm_forgot_password(&username, &code, &new_password)
                .await?;
            info!(%username, "password changed");
            Ok(())
        }
    }
}
