use std::sync::Arc;

use async_graphql::{EmptySubscription, Error, Object, Result, Schema, SimpleObject};
use models::{Cat, CatPatch};
use service::CatsService;
use tracing::debug;

pub type CatsSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
#[graphql(name = "Cat")]
pub struct CatNode {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub breed: String,
}

impl From<Cat> for CatNode {
    fn from(cat: Cat) -> Self {
        Self { id: cat.id, name: cat.name, age: cat.age, breed: cat.breed }
    }
}

fn non_null(field: &str) -> Error {
    Error::new(format!("Cannot return null for non-nullable field {field}."))
}

pub struct QueryRoot {
    cats: Arc<CatsService>,
}

#[Object]
impl QueryRoot {
    async fn cats(&self) -> Result<Vec<CatNode>> {
        let all = self.cats.find_all().await?;
        Ok(all.into_iter().map(CatNode::from).collect())
    }

    async fn cat(&self, id: i32) -> Result<CatNode> {
        self.cats
            .find_one(id)
            .await?
            .map(CatNode::from)
            .ok_or_else(|| non_null("Query.cat"))
    }
}

pub struct MutationRoot {
    cats: Arc<CatsService>,
}

#[Object]
impl MutationRoot {
    async fn create_cat(&self, id: i32, name: String, age: i32, breed: String) -> Result<CatNode> {
        let cat = self.cats.create(Cat { id, name, age, breed }).await?;
        Ok(cat.into())
    }

    /// Replaces name, age and breed of the first cat with `id`.
    async fn update_cat(&self, id: i32, name: String, age: i32, breed: String) -> Result<CatNode> {
        let patch = CatPatch { name: Some(name), age: Some(age), breed: Some(breed) };
        self.cats
            .update_and_fetch(id, &patch)
            .await?
            .map(CatNode::from)
            .ok_or_else(|| non_null("Mutation.updateCat"))
    }

    async fn remove_cat(&self, id: i32) -> Result<bool> {
        self.cats.remove(id).await?;
        debug!(id, "removeCat resolved");
        Ok(true)
    }
}

pub fn build_schema(cats: Arc<CatsService>) -> CatsSchema {
    Schema::build(
        QueryRoot { cats: cats.clone() },
        MutationRoot { cats },
        EmptySubscription,
    )
    .finish()
}
