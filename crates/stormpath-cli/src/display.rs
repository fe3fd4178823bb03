//! Display utilities for CLI output formatting

use colored::Colorize;

use stormpath_common::{Application, Directory, ResourceStatus, Tenant};

fn status_label(status: ResourceStatus) -> String {
    match status {
        ResourceStatus::Enabled => "ENABLED".green().to_string(),
        ResourceStatus::Disabled => "DISABLED".red().to_string(),
        _ => status.to_string(),
    }
}

/// Display the resolved tenant
pub fn display_tenant(tenant: &Tenant) {
    println!("{} {}", "Tenant:".bold(), tenant.name.bright_cyan());
    println!("  {} {}", "key: ".dimmed(), tenant.key);
    println!("  {} {}", "href:".dimmed(), tenant.href);
}

/// Display one resource line: name, status, then href and description underneath
fn display_resource(name: &str, status: ResourceStatus, href: &str, description: &str) {
    println!("{} [{}]", name.bold(), status_label(status));
    println!("  {}", href.dimmed());
    if !description.is_empty() {
        println!("  {description}");
    }
}

/// Display a list of applications
pub fn display_applications(apps: &[Application]) {
    for app in apps {
        display_resource(&app.name, app.status, &app.href, &app.description);
    }
    println!("{} application(s)", apps.len());
}

/// Display a list of directories
pub fn display_directories(dirs: &[Directory]) {
    for dir in dirs {
        display_resource(&dir.name, dir.status, &dir.href, &dir.description);
    }
    println!("{} directory(ies)", dirs.len());
}

/// Display a freshly created application
pub fn display_created(app: &Application) {
    println!("{} {}", "Created".green().bold(), app.name.bold());
    println!("  {}", app.href);
}
