use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Countries {
    Table,
    Id,
    Name,
    Code,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Password,
    Author,
    Admin,
    CountryId,
}

#[derive(Iden)]
enum Phones {
    Table,
    Id,
    Number,
    UserId,
}

#[derive(Iden)]
enum Posts {
    Table,
    Id,
    Title,
    Slug,
    Content,
    AuthorId,
    PublishedAt,
}

#[derive(Iden)]
enum Images {
    Table,
    Id,
    Url,
    ImageableType,
    ImageableId,
}

#[derive(Iden)]
enum Videos {
    Table,
    Id,
    Uuid,
    Url,
    Title,
    Description,
    UserId,
}

#[derive(Iden)]
enum Comments {
    Table,
    Id,
    Content,
    UserId,
    CommentableType,
    CommentableId,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    Uuid,
    Name,
}

#[derive(Iden)]
enum Taggables {
    Table,
    Id,
    TagId,
    TaggableType,
    TaggableId,
}

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // countries
        manager
            .create_table(
                Table::create()
                    .table(Countries::Table)
                    .if_not_exists()
                    .col(id_col(Countries::Id))
                    .col(ColumnDef::new(Countries::Name).string().not_null())
                    .col(ColumnDef::new(Countries::Code).string().not_null())
                    .to_owned(),
            )
            .await?;

        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_col(Users::Id))
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::Author)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::Admin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::CountryId).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_country_id")
                            .from(Users::Table, Users::CountryId)
                            .to(Countries::Table, Countries::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_users_country_id")
                    .table(Users::Table)
                    .col(Users::CountryId)
                    .to_owned(),
            )
            .await?;

        // phones
        manager
            .create_table(
                Table::create()
                    .table(Phones::Table)
                    .if_not_exists()
                    .col(id_col(Phones::Id))
                    .col(ColumnDef::new(Phones::Number).string().not_null())
                    .col(ColumnDef::new(Phones::UserId).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_phones_user_id")
                            .from(Phones::Table, Phones::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // posts
        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(id_col(Posts::Id))
                    .col(ColumnDef::new(Posts::Title).string().not_null())
                    .col(ColumnDef::new(Posts::Slug).string().not_null())
                    .col(ColumnDef::new(Posts::Content).text().not_null())
                    .col(ColumnDef::new(Posts::AuthorId).big_integer().null())
                    .col(
                        ColumnDef::new(Posts::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_author_id")
                            .from(Posts::Table, Posts::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_posts_slug")
                    .table(Posts::Table)
                    .col(Posts::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // images (morph target for posts and videos)
        manager
            .create_table(
                Table::create()
                    .table(Images::Table)
                    .if_not_exists()
                    .col(id_col(Images::Id))
                    .col(ColumnDef::new(Images::Url).string().not_null())
                    .col(ColumnDef::new(Images::ImageableType).string().null())
                    .col(ColumnDef::new(Images::ImageableId).big_integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_images_imageable")
                    .table(Images::Table)
                    .col(Images::ImageableType)
                    .col(Images::ImageableId)
                    .to_owned(),
            )
            .await?;

        // videos
        manager
            .create_table(
                Table::create()
                    .table(Videos::Table)
                    .if_not_exists()
                    .col(id_col(Videos::Id))
                    .col(ColumnDef::new(Videos::Uuid).string().not_null())
                    .col(ColumnDef::new(Videos::Url).string().not_null())
                    .col(ColumnDef::new(Videos::Title).string().not_null())
                    .col(ColumnDef::new(Videos::Description).text().not_null())
                    .col(ColumnDef::new(Videos::UserId).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_videos_user_id")
                            .from(Videos::Table, Videos::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_videos_uuid")
                    .table(Videos::Table)
                    .col(Videos::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // comments
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(id_col(Comments::Id))
                    .col(ColumnDef::new(Comments::Content).text().not_null())
                    .col(ColumnDef::new(Comments::UserId).big_integer().null())
                    .col(ColumnDef::new(Comments::CommentableType).string().null())
                    .col(ColumnDef::new(Comments::CommentableId).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_user_id")
                            .from(Comments::Table, Comments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_comments_commentable")
                    .table(Comments::Table)
                    .col(Comments::CommentableType)
                    .col(Comments::CommentableId)
                    .to_owned(),
            )
            .await?;

        // tags
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(id_col(Tags::Id))
                    .col(ColumnDef::new(Tags::Uuid).string().not_null())
                    .col(ColumnDef::new(Tags::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_tags_uuid")
                    .table(Tags::Table)
                    .col(Tags::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // taggables: polymorphic junction between tags and posts/videos.
        // The surrogate id only records insertion order.
        manager
            .create_table(
                Table::create()
                    .table(Taggables::Table)
                    .if_not_exists()
                    .col(id_col(Taggables::Id))
                    .col(ColumnDef::new(Taggables::TagId).big_integer().not_null())
                    .col(ColumnDef::new(Taggables::TaggableType).string().not_null())
                    .col(ColumnDef::new(Taggables::TaggableId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_taggables_tag_id")
                            .from(Taggables::Table, Taggables::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_taggables_tag_taggable")
                    .table(Taggables::Table)
                    .col(Taggables::TagId)
                    .col(Taggables::TaggableType)
                    .col(Taggables::TaggableId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_taggables_taggable")
                    .table(Taggables::Table)
                    .col(Taggables::TaggableType)
                    .col(Taggables::TaggableId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse dependency order
        manager
            .drop_table(Table::drop().table(Taggables::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Videos::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Images::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Posts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Phones::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Countries::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
