use safecampus_shared::models::Post;
use uuid::Uuid;

use crate::error::Result;
use crate::forms::PostForm;
use crate::state::ClientState;

pub async fn add_post(state: &ClientState, form: &PostForm) -> Result<Post> {
    form.validate()?;
    state.api.create_post(state.session(), form).await
}

pub async fn my_posts(state: &ClientState) -> Result<Vec<Post>> {
    let author = state.session().require_principal()?.owner_id();
    state.api.list_posts_by_author(state.session(), &author).await
}

pub async fn all_posts(state: &ClientState) -> Result<Vec<Post>> {
    state.api.list_posts(state.session()).await
}

pub async fn remove_post(state: &ClientState, id: Uuid) -> Result<String> {
    Ok(state.api.delete_post(state.session(), id).await?.message)
}
