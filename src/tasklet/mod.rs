/// SFTP file transfer tasklet.
pub mod sftp;
