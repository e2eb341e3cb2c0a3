// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Operations that modify the catalog.

use crate::driver::{Driver, map_anime_error};
use crate::model::*;
use animes_core::driver::DriverResult;

impl Driver {
    /// Adds a new anime called `name` to the catalog.
    pub(crate) async fn save(self, name: AnimeName) -> DriverResult<Anime> {
        let anime = self.repo.create(&name).await?;
        log::info!("Created anime {} named '{}'", anime.id(), anime.name().as_str());
        Ok(anime)
    }

    /// Replaces the contents of the existing anime with the same identifier as `anime`.
    pub(crate) async fn replace(self, anime: Anime) -> DriverResult<()> {
        self.repo.save(&anime).await.map_err(map_anime_error)?;
        log::info!("Renamed anime {} to '{}'", anime.id(), anime.name().as_str());
        Ok(())
    }

    /// Removes the anime identified by `id` from the catalog.
    pub(crate) async fn delete(self, id: AnimeId) -> DriverResult<()> {
        self.repo.delete(id).await.map_err(map_anime_error)?;
        log::info!("Deleted anime {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use animes_core::driver::DriverError;

    #[tokio::test]
    async fn test_save() {
        let context = TestContext::setup().await;

        let anime = context.driver().save(AnimeName::from("Chunibyou")).await.unwrap();
        assert_eq!(&AnimeName::from("Chunibyou"), anime.name());
        assert_eq!(anime, context.get(*anime.id()).await);

        let other = context.driver().save(AnimeName::from("Chunibyou")).await.unwrap();
        assert_ne!(anime.id(), other.id());
    }

    #[tokio::test]
    async fn test_replace() {
        let context = TestContext::setup().await;
        let animes = context.create_all(&["Chunibyou", "Berserk"]).await;

        let renamed = Anime::new(*animes[0].id(), AnimeName::from("Chunibyou2"));
        context.driver().replace(renamed.clone()).await.unwrap();
        context.driver().replace(renamed.clone()).await.unwrap();

        assert_eq!(renamed, context.get(*animes[0].id()).await);
        assert_eq!(animes[1], context.get(*animes[1].id()).await);
    }

    #[tokio::test]
    async fn test_replace_not_found() {
        let context = TestContext::setup().await;

        let anime = Anime::new(AnimeId::new(5), AnimeName::from("Chunibyou"));
        assert_eq!(
            DriverError::NotFound("Anime not found".to_owned()),
            context.driver().replace(anime).await.unwrap_err()
        );
        assert!(!context.exists(AnimeId::new(5)).await);
    }

    #[tokio::test]
    async fn test_delete() {
        let context = TestContext::setup().await;
        let animes = context.create_all(&["Chunibyou", "Berserk"]).await;

        context.driver().delete(*animes[0].id()).await.unwrap();

        assert!(!context.exists(*animes[0].id()).await);
        assert!(context.exists(*animes[1].id()).await);
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let context = TestContext::setup().await;

        assert_eq!(
            DriverError::NotFound("Anime not found".to_owned()),
            context.driver().delete(AnimeId::new(1)).await.unwrap_err()
        );
    }
}
