use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "jLearn API",
        description = "Lessons, vocabularies and users for the jLearn language-learning app."
    ),
    paths(
        crate::auth::register,
        crate::auth::sign_in,
        crate::resources::list_lessons,
        crate::resources::create_lesson,
        crate::resources::delete_lesson,
        crate::resources::update_lesson,
        crate::resources::list_users,
        crate::resources::delete_user,
        crate::resources::update_user_role,
        crate::resources::list_vocabularies,
        crate::resources::create_vocabulary,
        crate::resources::delete_vocabulary,
        crate::resources::update_vocabulary,
    ),
    components(schemas(
        jlearn_common::RegisterRequest,
        jlearn_common::Credentials,
        jlearn_common::RegisterResponse,
        jlearn_common::LoginResponse,
        jlearn_common::Role,
        jlearn_common::UserDto,
        jlearn_common::RoleUpdate,
        jlearn_common::Lesson,
        jlearn_common::Vocabulary,
        jlearn_common::DocumentPatch,
        jlearn_common::InsertResult,
        jlearn_common::DeleteResult,
        jlearn_common::UpdateResult,
        jlearn_common::MessageResponse,
    )),
    tags(
        (name = "auth", description = "Registration and sign-in"),
        (name = "lessons", description = "Lesson documents"),
        (name = "users", description = "User accounts"),
        (name = "vocabularies", description = "Vocabulary documents"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by the mutation routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
