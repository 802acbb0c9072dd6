//! Static configuration mapping generated route-helper files to the form
//! methods they must expose.
//!
//! The table is injected into [`crate::augmentor::run`] so tests can build
//! fixtures; [`default_table`] carries the entries shipped with the build
//! step. Order matters: files and methods are processed exactly as listed.

use std::path::{Path, PathBuf};

/// One form method to derive for a generated route helper.
#[derive(Debug, Clone)]
pub struct MethodEntry {
    /// Exported helper name, e.g. `update`.
    pub method: String,
    /// Lowercase verb of the canonical base definition, e.g. `patch`.
    pub http_method: String,
    /// Route path, cited in the generated doc comment.
    pub route: String,
    /// Originating controller method name.
    pub controller_method: String,
    /// `file:line` citation of the controller method, informational only.
    pub source_location: String,
}

impl MethodEntry {
    #[must_use]
    pub fn new(
        method: &str,
        http_method: &str,
        route: &str,
        controller_method: &str,
        source_location: &str,
    ) -> Self {
        Self {
            method: method.to_string(),
            http_method: http_method.to_string(),
            route: route.to_string(),
            controller_method: controller_method.to_string(),
            source_location: source_location.to_string(),
        }
    }
}

/// Ordered collection of per-file method entries, immutable during a run.
#[derive(Debug, Default, Clone)]
pub struct RouteMethodTable {
    entries: Vec<(PathBuf, Vec<MethodEntry>)>,
}

impl RouteMethodTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<PathBuf>, methods: Vec<MethodEntry>) -> Self {
        self.entries.push((file.into(), methods));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[MethodEntry])> {
        self.entries
            .iter()
            .map(|(file, methods)| (file.as_path(), methods.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The table shipped with the build step, one entry per generated controller
/// helper.
#[must_use]
pub fn default_table() -> RouteMethodTable {
    RouteMethodTable::new()
        .with_file(
            "App/Http/Controllers/Settings/ProfileController.ts",
            vec![
                MethodEntry::new(
                    "update",
                    "patch",
                    "/settings/profile",
                    "update",
                    "app/Http/Controllers/Settings/ProfileController.php:30",
                ),
                MethodEntry::new(
                    "destroy",
                    "delete",
                    "/settings/profile",
                    "destroy",
                    "app/Http/Controllers/Settings/ProfileController.php:49",
                ),
            ],
        )
        .with_file(
            "App/Http/Controllers/Settings/PasswordController.ts",
            vec![MethodEntry::new(
                "update",
                "put",
                "/settings/password",
                "update",
                "app/Http/Controllers/Settings/PasswordController.php:26",
            )],
        )
        .with_file(
            "App/Http/Controllers/Auth/AuthenticatedSessionController.ts",
            vec![MethodEntry::new(
                "store",
                "post",
                "/login",
                "store",
                "app/Http/Controllers/Auth/AuthenticatedSessionController.php:30",
            )],
        )
        .with_file(
            "App/Http/Controllers/Auth/ConfirmablePasswordController.ts",
            vec![MethodEntry::new(
                "store",
                "post",
                "/confirm-password",
                "store",
                "app/Http/Controllers/Auth/ConfirmablePasswordController.php:26",
            )],
        )
        .with_file(
            "App/Http/Controllers/Auth/EmailVerificationNotificationController.ts",
            vec![MethodEntry::new(
                "store",
                "post",
                "/email/verification-notification",
                "store",
                "app/Http/Controllers/Auth/EmailVerificationNotificationController.php:14",
            )],
        )
        .with_file(
            "App/Http/Controllers/Auth/NewPasswordController.ts",
            vec![MethodEntry::new(
                "store",
                "post",
                "/reset-password",
                "store",
                "app/Http/Controllers/Auth/NewPasswordController.php:36",
            )],
        )
        .with_file(
            "App/Http/Controllers/Auth/PasswordResetLinkController.ts",
            vec![MethodEntry::new(
                "store",
                "post",
                "/forgot-password",
                "store",
                "app/Http/Controllers/Auth/PasswordResetLinkController.php:29",
            )],
        )
        .with_file(
            "App/Http/Controllers/Auth/RegisteredUserController.ts",
            vec![MethodEntry::new(
                "store",
                "post",
                "/register",
                "store",
                "app/Http/Controllers/Auth/RegisteredUserController.php:31",
            )],
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = default_table();

        assert_eq!(table.len(), 8);
        assert!(!table.is_empty());

        let (file, methods) = table.iter().next().unwrap();
        assert_eq!(
            file,
            Path::new("App/Http/Controllers/Settings/ProfileController.ts")
        );
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].method, "update");
        assert_eq!(methods[0].http_method, "patch");
        assert_eq!(methods[1].method, "destroy");
        assert_eq!(methods[1].http_method, "delete");
    }

    #[test]
    fn test_table_preserves_order() {
        let table = RouteMethodTable::new()
            .with_file("b.ts", vec![MethodEntry::new("x", "post", "/x", "x", "b.php:1")])
            .with_file("a.ts", vec![MethodEntry::new("y", "put", "/y", "y", "a.php:2")]);

        let files: Vec<_> = table.iter().map(|(file, _)| file).collect();
        assert_eq!(files, vec![Path::new("b.ts"), Path::new("a.ts")]);
    }
}
