#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};

use yatube_api::application::{AppServices, Repositories};
use yatube_api::data::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};
use yatube_api::domain::group::NewGroup;
use yatube_api::domain::post::{NewPost, PostChanges};
use yatube_api::domain::{Comment, DomainError, Follow, Group, Post, User};
use yatube_api::infrastructure::jwt::JwtService;

pub const SECRET: &str = "integration-test-secret-of-adequate-length";

#[derive(Default)]
struct State {
    next_id: i64,
    users: Vec<User>,
    groups: Vec<Group>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: Vec<Follow>,
}

impl State {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn username(&self, id: i64) -> String {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }
}

/// In-memory stand-in for the Postgres repositories.
#[derive(Clone, Default)]
pub struct MemoryStore(Arc<Mutex<State>>);

impl MemoryStore {
    pub fn add_user(&self, username: &str) -> User {
        let mut state = self.0.lock().unwrap();
        let user = User {
            id: state.id(),
            username: username.to_string(),
            email: None,
            password_hash: String::new(),
            date_joined: Utc::now(),
        };
        state.users.push(user.clone());
        user
    }

    pub fn add_group(&self, title: &str, slug: &str) -> Group {
        let mut state = self.0.lock().unwrap();
        let group = Group {
            id: state.id(),
            title: title.to_string(),
            slug: slug.to_string(),
            description: String::new(),
        };
        state.groups.push(group.clone());
        group
    }

    pub fn add_post(&self, author: &User, text: &str) -> Post {
        let mut state = self.0.lock().unwrap();
        let post = Post {
            id: state.id(),
            text: text.to_string(),
            pub_date: Utc::now(),
            author_id: author.id,
            author_username: author.username.clone(),
            group_id: None,
            image: None,
        };
        state.posts.push(post.clone());
        post
    }

    pub fn add_follow(&self, user: &User, following: &User) -> Follow {
        let mut state = self.0.lock().unwrap();
        let follow = Follow {
            id: state.id(),
            user_id: user.id,
            user_username: user.username.clone(),
            following_id: following.id,
            following_username: following.username.clone(),
        };
        state.follows.push(follow.clone());
        follow
    }

    pub fn posts(&self) -> Vec<Post> {
        self.0.lock().unwrap().posts.clone()
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.0.lock().unwrap().comments.clone()
    }

    pub fn follows(&self) -> Vec<Follow> {
        self.0.lock().unwrap().follows.clone()
    }

    pub fn services(&self) -> AppServices {
        let repos = Repositories {
            users: Arc::new(self.clone()),
            groups: Arc::new(self.clone()),
            posts: Arc::new(self.clone()),
            comments: Arc::new(self.clone()),
            follows: Arc::new(self.clone()),
        };
        AppServices::new(repos, Arc::new(JwtService::new(SECRET, 1).unwrap()))
    }
}

pub fn token_for(user: &User) -> String {
    JwtService::new(SECRET, 1)
        .unwrap()
        .generate_token(user.id, user.username.clone())
        .unwrap()
}

pub fn bearer(user: &User) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(user)))
}

/// Builds the API over `$store` the same way the server binary does.
macro_rules! app {
    ($store:expr) => {{
        let services = $store.services();
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(|cfg| yatube_api::presentation::routes::configure(cfg, &services)),
        )
        .await
    }};
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(
        &self,
        username: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> Result<User, DomainError> {
        let mut state = self.0.lock().unwrap();
        if state.users.iter().any(|u| u.username == username) {
            return Err(DomainError::validation("username already exists"));
        }
        let user = User {
            id: state.id(),
            username: username.to_string(),
            email: email.map(str::to_string),
            password_hash: password_hash.to_string(),
            date_joined: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<User, DomainError> {
        let state = self.0.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(DomainError::UserNotFound)
    }

    async fn find_by_id(&self, id: i64) -> Result<User, DomainError> {
        let state = self.0.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(DomainError::UserNotFound)
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn create(&self, group: NewGroup) -> Result<Group, DomainError> {
        let mut state = self.0.lock().unwrap();
        if state.groups.iter().any(|g| g.slug == group.slug) {
            return Err(DomainError::validation("slug already exists"));
        }
        let group = Group {
            id: state.id(),
            title: group.title,
            slug: group.slug,
            description: group.description,
        };
        state.groups.push(group.clone());
        Ok(group)
    }

    async fn find_by_id(&self, id: i64) -> Result<Group, DomainError> {
        let state = self.0.lock().unwrap();
        state
            .groups
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or(DomainError::GroupNotFound)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Group, DomainError> {
        let state = self.0.lock().unwrap();
        state
            .groups
            .iter()
            .find(|g| g.slug == slug)
            .cloned()
            .ok_or(DomainError::GroupNotFound)
    }

    async fn list(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.0.lock().unwrap().groups.clone())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, author_id: i64, post: NewPost) -> Result<Post, DomainError> {
        let mut state = self.0.lock().unwrap();
        let post = Post {
            id: state.id(),
            text: post.text,
            pub_date: Utc::now(),
            author_id,
            author_username: state.username(author_id),
            group_id: post.group_id,
            image: post.image,
        };
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: i64) -> Result<Post, DomainError> {
        let state = self.0.lock().unwrap();
        state
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(DomainError::PostNotFound)
    }

    async fn update(&self, id: i64, changes: PostChanges) -> Result<Post, DomainError> {
        let mut state = self.0.lock().unwrap();
        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::PostNotFound)?;
        if let Some(text) = changes.text {
            post.text = text;
        }
        if let Some(group_id) = changes.group_id {
            post.group_id = group_id;
        }
        if let Some(image) = changes.image {
            post.image = image;
        }
        Ok(post.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let mut state = self.0.lock().unwrap();
        let before = state.posts.len();
        state.posts.retain(|p| p.id != id);
        if state.posts.len() == before {
            return Err(DomainError::PostNotFound);
        }
        state.comments.retain(|c| c.post_id != id);
        Ok(())
    }

    async fn list(&self, limit: Option<i64>, offset: i64) -> Result<(Vec<Post>, i64), DomainError> {
        let state = self.0.lock().unwrap();
        let total = state.posts.len() as i64;
        let posts = state
            .posts
            .iter()
            .skip(offset as usize)
            .take(limit.map(|l| l as usize).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok((posts, total))
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment, DomainError> {
        let mut state = self.0.lock().unwrap();
        let comment = Comment {
            id: state.id(),
            text: text.to_string(),
            created: Utc::now(),
            post_id,
            author_id,
            author_username: state.username(author_id),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_for_post(&self, post_id: i64, id: i64) -> Result<Comment, DomainError> {
        let state = self.0.lock().unwrap();
        state
            .comments
            .iter()
            .find(|c| c.post_id == post_id && c.id == id)
            .cloned()
            .ok_or(DomainError::CommentNotFound)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let state = self.0.lock().unwrap();
        Ok(state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, text: &str) -> Result<Comment, DomainError> {
        let mut state = self.0.lock().unwrap();
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DomainError::CommentNotFound)?;
        comment.text = text.to_string();
        Ok(comment.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let mut state = self.0.lock().unwrap();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        if state.comments.len() == before {
            Err(DomainError::CommentNotFound)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FollowRepository for MemoryStore {
    async fn create(&self, user_id: i64, following_id: i64) -> Result<Follow, DomainError> {
        let mut state = self.0.lock().unwrap();
        if state
            .follows
            .iter()
            .any(|f| f.user_id == user_id && f.following_id == following_id)
        {
            return Err(DomainError::validation("You are already following this user"));
        }
        let follow = Follow {
            id: state.id(),
            user_id,
            user_username: state.username(user_id),
            following_id,
            following_username: state.username(following_id),
        };
        state.follows.push(follow.clone());
        Ok(follow)
    }

    async fn exists(&self, user_id: i64, following_id: i64) -> Result<bool, DomainError> {
        let state = self.0.lock().unwrap();
        Ok(state
            .follows
            .iter()
            .any(|f| f.user_id == user_id && f.following_id == following_id))
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Follow>, DomainError> {
        let state = self.0.lock().unwrap();
        Ok(state
            .follows
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }
}
