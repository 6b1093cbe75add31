use actix_web::web;

pub mod routes {
    pub mod contact;
}

mod services {
    pub(crate) mod contact;
}

pub mod dtos {
    pub mod contact;
}

pub fn mount_contacts() -> actix_web::Scope {
    web::scope("/contacts")
        .service(routes::contact::get_contacts)
        .service(routes::contact::post_contact)
        .service(routes::contact::get_contact)
        .service(routes::contact::put_contact)
        .service(routes::contact::delete_contact)
        .service(routes::contact::patch_favorite)
}
