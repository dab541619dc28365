//! Page assemblers. Each function loads what one page shows through the
//! [`crate::planner`], projects it, and returns the page context.

use crate::error::Result;
use crate::planner::{self, HOMEPAGE_LIMIT, TAG_PAGE_LIMIT};
use crate::project::{self, PostDetailView, PostView, TagView};
use crate::url::Urls;
use rusqlite::Connection;

/// The homepage: the most liked posts, the newest posts, and the most used
/// tags.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexPage {
    pub most_popular_posts: Vec<PostView>,
    pub page_posts: Vec<PostView>,
    pub popular_tags: Vec<TagView>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PostDetailPage {
    pub post: PostDetailView,
    pub popular_tags: Vec<TagView>,
    pub most_popular_posts: Vec<PostView>,
}

/// The listing of posts carrying one tag.
#[derive(Clone, Debug, PartialEq)]
pub struct TagPage {
    pub tag: String,
    pub posts: Vec<PostView>,
    pub popular_tags: Vec<TagView>,
    pub most_popular_posts: Vec<PostView>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContactsPage;

pub fn index(conn: &Connection, urls: &Urls) -> Result<IndexPage> {
    Ok(IndexPage {
        most_popular_posts: popular_posts(conn, urls)?,
        page_posts: project::posts(&planner::fresh_posts(conn, HOMEPAGE_LIMIT)?, urls)?,
        popular_tags: popular_tags(conn, urls)?,
    })
}

pub fn post_detail(conn: &Connection, urls: &Urls, slug: &str) -> Result<PostDetailPage> {
    let detail = planner::post_detail(conn, slug)?;
    Ok(PostDetailPage {
        post: project::post_detail(&detail, urls)?,
        popular_tags: popular_tags(conn, urls)?,
        most_popular_posts: popular_posts(conn, urls)?,
    })
}

pub fn tag_filter(conn: &Connection, urls: &Urls, title: &str) -> Result<TagPage> {
    let tag = planner::tag_by_title(conn, title)?;
    let posts = planner::tag_posts(conn, &tag, TAG_PAGE_LIMIT)?;
    Ok(TagPage {
        posts: project::posts(&posts, urls)?,
        popular_tags: popular_tags(conn, urls)?,
        most_popular_posts: popular_posts(conn, urls)?,
        tag: tag.title,
    })
}

pub fn contacts() -> ContactsPage {
    ContactsPage
}

// Sidebar widgets shared by every data page.

fn popular_posts(conn: &Connection, urls: &Urls) -> Result<Vec<PostView>> {
    project::posts(&planner::popular_posts(conn, HOMEPAGE_LIMIT)?, urls)
}

fn popular_tags(conn: &Connection, urls: &Urls) -> Result<Vec<TagView>> {
    Ok(project::tags(&planner::popular_tags(conn, HOMEPAGE_LIMIT)?, urls))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use crate::testutil::Fixture;
    use crate::url::fixture as urls;

    // Seeds `count` posts one day apart, every one tagged `rust`, and likes
    // the older ones more.
    fn seed(f: &Fixture, count: u32) -> Result<()> {
        let author = f.user("craig")?;
        let rust = f.tag("rust")?;
        let readers: Vec<i64> = (0..count)
            .map(|i| f.user(&format!("reader-{}", i)))
            .collect::<Result<_>>()?;
        for i in 0..count {
            let post = f.post(
                &format!("post-{:02}", i),
                author,
                &format!("2021-01-{:02} 12:00:00", i + 1),
            )?;
            f.tag_post(post, rust)?;
            for reader in &readers[..(count - i) as usize] {
                f.like(post, *reader)?;
            }
        }
        Ok(())
    }

    #[test]
    fn test_index() -> Result<()> {
        let f = Fixture::new()?;
        seed(&f, 8)?;
        let page = index(f.conn(), &urls())?;

        assert_eq!(HOMEPAGE_LIMIT, page.page_posts.len());
        assert!(page
            .page_posts
            .windows(2)
            .all(|w| w[0].published_at > w[1].published_at));
        assert_eq!("post-07", page.page_posts[0].slug);

        assert_eq!(HOMEPAGE_LIMIT, page.most_popular_posts.len());
        assert_eq!("post-00", page.most_popular_posts[0].slug);

        assert_eq!(1, page.popular_tags.len());
        assert_eq!(8, page.popular_tags[0].posts_with_tag);
        Ok(())
    }

    #[test]
    fn test_index_empty_site() -> Result<()> {
        let f = Fixture::new()?;
        let page = index(f.conn(), &urls())?;
        assert!(page.page_posts.is_empty());
        assert!(page.most_popular_posts.is_empty());
        assert!(page.popular_tags.is_empty());
        Ok(())
    }

    #[test]
    fn test_index_fails_on_untagged_post() -> Result<()> {
        let f = Fixture::new()?;
        seed(&f, 2)?;
        let author = f.user("ada")?;
        f.post("untagged", author, "2022-01-01 00:00:00")?;
        assert!(matches!(
            index(f.conn(), &urls()),
            Err(Error::EmptyTagList { slug }) if slug == "untagged"
        ));
        Ok(())
    }

    #[test]
    fn test_post_detail() -> Result<()> {
        let f = Fixture::new()?;
        seed(&f, 3)?;
        let page = post_detail(f.conn(), &urls(), "post-01")?;
        assert_eq!("Title of post-01", page.post.title);
        assert_eq!(2, page.post.likes_amount);
        let tags: Vec<&str> = page.post.tags.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(vec!["rust"], tags);
        assert_eq!(3, page.most_popular_posts.len());
        assert_eq!(1, page.popular_tags.len());
        Ok(())
    }

    #[test]
    fn test_post_detail_unknown_slug() -> Result<()> {
        let f = Fixture::new()?;
        seed(&f, 1)?;
        assert!(post_detail(f.conn(), &urls(), "nope").unwrap_err().is_not_found());
        Ok(())
    }

    #[test]
    fn test_tag_filter() -> Result<()> {
        let f = Fixture::new()?;
        seed(&f, 25)?;
        let page = tag_filter(f.conn(), &urls(), "rust")?;
        assert_eq!("rust", page.tag);
        assert_eq!(TAG_PAGE_LIMIT, page.posts.len());
        assert_eq!(HOMEPAGE_LIMIT, page.most_popular_posts.len());
        assert!(page.posts.iter().all(|p| p.first_tag_title == "rust"));
        Ok(())
    }

    #[test]
    fn test_tag_filter_unknown_tag() -> Result<()> {
        let f = Fixture::new()?;
        assert!(tag_filter(f.conn(), &urls(), "nope").unwrap_err().is_not_found());
        Ok(())
    }
}
