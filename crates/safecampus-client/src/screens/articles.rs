use safecampus_shared::models::Article;
use uuid::Uuid;

use crate::error::Result;
use crate::forms::ArticleForm;
use crate::state::ClientState;

pub async fn list_articles(state: &ClientState) -> Result<Vec<Article>> {
    state.api.list_articles(state.session()).await
}

pub async fn add_article(state: &ClientState, form: &ArticleForm) -> Result<Article> {
    form.validate()?;
    state.api.create_article(state.session(), form).await
}

/// Without a new image the article keeps its current one.
pub async fn edit_article(state: &ClientState, id: Uuid, form: &ArticleForm) -> Result<Article> {
    form.validate_edit()?;
    state.api.update_article(state.session(), id, form).await
}

pub async fn remove_article(state: &ClientState, id: Uuid) -> Result<String> {
    Ok(state.api.delete_article(state.session(), id).await?.message)
}
