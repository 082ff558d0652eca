use crate::{
    AdminSubcommand, App, CliError, Command, OwnerSubcommand, RestaurantsSubcommand,
    UsersSubcommand,
};
use foodas::api::UploadFile;
use foodas::routing::{Navigation, nav_links};
use foodas::ApiError;
use foodas::http::extract_message;
use serde::Serialize;
use shared_http::api::{
    CreateUserRequest, OwnerApplicationRequest, RegisterRequest, RestaurantUpdate,
    UpdateUserRequest,
};
use tracing::debug;

const SESSION_EXPIRED: &str = "Your session has expired, please sign in again";

/// How failures of one command are put into words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wording {
    /// Body fields whose messages win over `detail`
    pub fields: &'static [&'static str],
    /// The command checks credentials, so a 401 is a form failure rather
    /// than an expired session
    pub checks_credentials: bool,
    pub fallback: &'static str,
}

impl Wording {
    const fn new(fields: &'static [&'static str], fallback: &'static str) -> Self {
        Self {
            fields,
            checks_credentials: false,
            fallback,
        }
    }

    const fn credentials(fields: &'static [&'static str], fallback: &'static str) -> Self {
        Self {
            fields,
            checks_credentials: true,
            fallback,
        }
    }
}

/// Wording for failures of `command`
pub fn wording(command: &Command) -> Wording {
    match command {
        Command::Login { .. } => Wording::credentials(&[], "Login failed."),
        Command::Register { .. } => Wording::credentials(&["email"], "Registration failed."),
        Command::Restaurants(cmd) => match cmd.command {
            RestaurantsSubcommand::Show { .. } => {
                Wording::new(&[], "Restaurant not found or inactive.")
            }
            RestaurantsSubcommand::Update { .. } => {
                Wording::new(&["google_maps_link", "name", "phone"], "Save failed.")
            }
            RestaurantsSubcommand::AddPhoto { .. } => {
                Wording::new(&["image_url", "file"], "Failed to add photo.")
            }
            RestaurantsSubcommand::DeletePhoto { .. } => Wording::new(&[], "Failed to delete."),
            RestaurantsSubcommand::List { .. } | RestaurantsSubcommand::Mine => {
                Wording::new(&[], "Failed to load")
            }
        },
        Command::Owner(cmd) => match cmd.command {
            OwnerSubcommand::Apply { .. } => Wording::new(
                &[],
                "Submission failed. Please check required fields and try again.",
            ),
            OwnerSubcommand::Upload { .. } => Wording::new(&["file"], "Upload failed."),
            OwnerSubcommand::Status => Wording::new(&[], "Failed to load"),
        },
        Command::Users(cmd) => match cmd.command {
            UsersSubcommand::Create { .. } | UsersSubcommand::Update { .. } => {
                Wording::new(&["email", "role", "password"], "Save failed.")
            }
            UsersSubcommand::List { .. } | UsersSubcommand::Show { .. } => {
                Wording::new(&[], "Failed to load")
            }
        },
        Command::Admin(_) => Wording::new(&[], "Action failed."),
        Command::Logout
        | Command::Whoami
        | Command::Menu { .. }
        | Command::Open { .. } => Wording::new(&[], "Request failed."),
    }
}

pub async fn run(app: &App, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login {
            email,
            password,
            from,
        } => {
            let payload = app.session.login(&email, &password).await?;
            print_json(&payload.user)?;
            report(app.router.after_login(from.as_deref()));
        }
        Command::Logout => {
            app.router.logout();
            println!("Signed out");
        }
        Command::Register {
            name,
            email,
            phone,
            password,
        } => {
            let user = app
                .session
                .register(&RegisterRequest {
                    name,
                    email,
                    phone,
                    password,
                })
                .await?;
            println!("Registered {}, sign in to continue", user.email);
        }
        Command::Whoami => match app.session.current_user() {
            Some(user) => print_json(&user)?,
            None => println!("Not signed in"),
        },
        Command::Menu { at } => {
            let user = app.session.current_user();
            for link in nav_links(user.as_ref()) {
                let marker = if link.is_active(&at) { "*" } else { " " };
                println!("{} {:<22} {}", marker, link.label, link.route.path());
            }
        }
        Command::Open { path } => report(app.router.navigate_when_ready(&path).await),
        Command::Restaurants(cmd) => restaurants(app, cmd.command).await?,
        Command::Owner(cmd) => owner(app, cmd.command).await?,
        Command::Admin(cmd) => admin(app, cmd.command).await?,
        Command::Users(cmd) => users(app, cmd.command).await?,
    }
    Ok(())
}

/// Human-readable message for a failed command.
///
/// A message in the response body always wins. A bare 401 from a command
/// that does not check credentials means the session could not be renewed.
pub fn describe(error: &CliError, wording: Wording) -> String {
    let CliError::Api(e) = error else {
        return error.to_string();
    };

    if let Some(message) = e.body().and_then(|body| extract_message(body, wording.fields)) {
        return message;
    }
    if e.is_unauthorized() && !wording.checks_credentials {
        return SESSION_EXPIRED.to_string();
    }
    match e {
        ApiError::Unauthorized { .. } | ApiError::Status { .. } => wording.fallback.to_string(),
        other => other.to_string(),
    }
}

async fn restaurants(app: &App, command: RestaurantsSubcommand) -> Result<(), CliError> {
    let api = app.client().restaurants();
    match command {
        RestaurantsSubcommand::List { search, city } => {
            print_json(&api.list(&search, &city).await?)?
        }
        RestaurantsSubcommand::Show { id } => {
            enter(app, &format!("/restaurants/{}", id)).await?;
            print_json(&api.get(id).await?)?
        }
        RestaurantsSubcommand::Mine => {
            enter(app, "/owner-dashboard").await?;
            print_json(&api.me().await?)?
        }
        RestaurantsSubcommand::Update {
            name,
            address,
            city,
            phone,
            operating_hours,
            google_maps_link,
        } => {
            enter(app, "/owner-dashboard/edit").await?;
            let update = RestaurantUpdate {
                name,
                address,
                city,
                phone,
                operating_hours,
                google_maps_link,
                ..Default::default()
            };
            print_json(&api.update_me(&update).await?)?
        }
        RestaurantsSubcommand::AddPhoto {
            file,
            caption,
            order,
        } => {
            enter(app, "/owner-dashboard/photos").await?;
            let url = app.client().owner().upload(read_file(&file)?).await?;
            print_json(&api.add_photo(&url, &caption, order).await?)?
        }
        RestaurantsSubcommand::DeletePhoto { id } => {
            enter(app, "/owner-dashboard/photos").await?;
            api.delete_photo(id).await?;
            println!("Deleted photo {}", id);
        }
    }
    Ok(())
}

async fn owner(app: &App, command: OwnerSubcommand) -> Result<(), CliError> {
    let api = app.client().owner();
    match command {
        OwnerSubcommand::Apply {
            restaurant_name,
            address,
            city,
            contact_name,
            contact_phone,
            operating_hours,
            proof,
            proof_url,
            accept_declaration,
        } => {
            enter(app, "/apply").await?;
            let proof_document_url = match proof {
                Some(path) => api.upload(read_file(&path)?).await?,
                None => proof_url,
            };
            let application = OwnerApplicationRequest {
                restaurant_name,
                business_address: address,
                city,
                contact_person_name: contact_name,
                contact_phone,
                operating_hours,
                proof_document_url,
                declaration_accepted: accept_declaration,
                ..Default::default()
            };
            print_json(&api.apply(&application).await?)?
        }
        OwnerSubcommand::Status => {
            enter(app, "/application-status").await?;
            print_json(&api.application_status().await?)?
        }
        OwnerSubcommand::Upload { file } => {
            enter(app, "/apply").await?;
            println!("{}", api.upload(read_file(&file)?).await?);
        }
    }
    Ok(())
}

async fn admin(app: &App, command: AdminSubcommand) -> Result<(), CliError> {
    let api = app.client().admin();
    match command {
        AdminSubcommand::List => {
            enter(app, "/admin/applications").await?;
            print_json(&api.list_applications().await?)?
        }
        AdminSubcommand::Show { id } => {
            enter(app, &format!("/admin/applications/{}", id)).await?;
            print_json(&api.get_application(id).await?)?
        }
        AdminSubcommand::Approve { id, notes } => {
            enter(app, &format!("/admin/applications/{}", id)).await?;
            print_json(&api.approve(id, &notes).await?)?
        }
        AdminSubcommand::Reject { id, notes } => {
            enter(app, &format!("/admin/applications/{}", id)).await?;
            print_json(&api.reject(id, &notes).await?)?
        }
    }
    Ok(())
}

async fn users(app: &App, command: UsersSubcommand) -> Result<(), CliError> {
    let api = app.client().superadmin();
    match command {
        UsersSubcommand::List { search } => {
            enter(app, "/superadmin/users").await?;
            print_json(&api.list_users(&search).await?)?
        }
        UsersSubcommand::Show { id } => {
            enter(app, &format!("/superadmin/users/{}", id)).await?;
            print_json(&api.get_user(id).await?)?
        }
        UsersSubcommand::Create {
            name,
            email,
            phone,
            password,
            role,
        } => {
            enter(app, "/superadmin/users/create").await?;
            let profile = CreateUserRequest {
                name,
                email,
                phone,
                password,
                role,
            };
            print_json(&api.create_user(&profile).await?)?
        }
        UsersSubcommand::Update {
            id,
            name,
            email,
            phone,
            role,
            active,
        } => {
            enter(app, &format!("/superadmin/users/{}", id)).await?;
            let update = UpdateUserRequest {
                name,
                email,
                phone,
                role,
                is_active: active,
            };
            print_json(&api.update_user(id, &update).await?)?
        }
    }
    Ok(())
}

/// Run the guard for the view a command belongs to
async fn enter(app: &App, path: &str) -> Result<(), CliError> {
    match app.router.navigate_when_ready(path).await {
        Navigation::Render(route) => {
            debug!("Entered {}", route.title());
            Ok(())
        }
        Navigation::Pending(_) => Err(ApiError::InvalidRequest(
            "session is still loading".to_string(),
        )
        .into()),
        Navigation::Redirected(location) => Err(CliError::Denied(location.to_string())),
    }
}

fn report(navigation: Navigation) {
    match navigation {
        Navigation::Render(route) => println!("-> {} ({})", route.path(), route.title()),
        Navigation::Pending(route) => println!("-> {} (loading)", route.path()),
        Navigation::Redirected(location) => println!("-> redirected to {}", location),
    }
}

fn read_file(path: &str) -> Result<UploadFile, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_string(),
        source,
    })?;
    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    Ok(UploadFile::new(file_name, bytes))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
